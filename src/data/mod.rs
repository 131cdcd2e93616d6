pub mod document;
pub mod freq;
pub mod i18n;
pub mod registry;
pub mod routes;
pub mod strokes;
