//! Customer-facing message composition.

pub mod composer;
pub mod provider;
pub mod quote;
pub mod share;
pub mod template;

pub use composer::{render_availability, render_reservation, MessageComposer};
pub use provider::{StaticTemplates, StoreTemplates, TemplateProvider};
pub use share::whatsapp_link;
pub use template::{replace_variables, TemplateKey, TemplateSet, TemplateVars};
