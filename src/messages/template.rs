//! Message templates and `{name}` placeholder substitution.

use std::collections::HashMap;
use std::fmt;

use crate::error::{AppError, Result};
use crate::models::MessageTemplate;

/// Logical template keys stored in `message_templates.template_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKey {
    AvailabilityHeader,
    AvailabilityGuestInfo,
    AvailabilityUnit,
    AvailabilityUnitDiscount,
    AvailabilityService,
    AvailabilityFooter,
    ReservationHeader,
    ReservationUnitsTitle,
    ReservationUnit,
    ReservationUnitDiscount,
    ReservationServicesTitle,
    ReservationService,
    ReservationTotal,
    ReservationDeposit,
}

impl TemplateKey {
    pub const ALL: [TemplateKey; 14] = [
        TemplateKey::AvailabilityHeader,
        TemplateKey::AvailabilityGuestInfo,
        TemplateKey::AvailabilityUnit,
        TemplateKey::AvailabilityUnitDiscount,
        TemplateKey::AvailabilityService,
        TemplateKey::AvailabilityFooter,
        TemplateKey::ReservationHeader,
        TemplateKey::ReservationUnitsTitle,
        TemplateKey::ReservationUnit,
        TemplateKey::ReservationUnitDiscount,
        TemplateKey::ReservationServicesTitle,
        TemplateKey::ReservationService,
        TemplateKey::ReservationTotal,
        TemplateKey::ReservationDeposit,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TemplateKey::AvailabilityHeader => "availability_header",
            TemplateKey::AvailabilityGuestInfo => "availability_guest_info",
            TemplateKey::AvailabilityUnit => "availability_unit",
            TemplateKey::AvailabilityUnitDiscount => "availability_unit_discount",
            TemplateKey::AvailabilityService => "availability_service",
            TemplateKey::AvailabilityFooter => "availability_footer",
            TemplateKey::ReservationHeader => "reservation_header",
            TemplateKey::ReservationUnitsTitle => "reservation_units_title",
            TemplateKey::ReservationUnit => "reservation_unit",
            TemplateKey::ReservationUnitDiscount => "reservation_unit_discount",
            TemplateKey::ReservationServicesTitle => "reservation_services_title",
            TemplateKey::ReservationService => "reservation_service",
            TemplateKey::ReservationTotal => "reservation_total",
            TemplateKey::ReservationDeposit => "reservation_deposit",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == value)
    }

    /// Built-in content used to seed a fresh store.
    pub fn default_content(self) -> &'static str {
        match self {
            TemplateKey::AvailabilityHeader => "✅*{min_nights} noches o más {discount}% de descuento*",
            TemplateKey::AvailabilityGuestInfo => "_Para {guests}:_",
            TemplateKey::AvailabilityUnit => "🟠 {name} || {price} / noche",
            TemplateKey::AvailabilityUnitDiscount => {
                "🟠 {name} || {price} / noche ({discount}% descuento aplicado)"
            }
            TemplateKey::AvailabilityService => "🥐 *{name}* (opcional) _{price} {mode}_",
            TemplateKey::AvailabilityFooter => {
                "📝 *Modo de reserva*\n* Depósito: {deposit}% para confirmar la reserva.\n* Medios de pago: aceptamos efectivo, transferencias. Tarjetas, QR y link de pago (*10% de recargo*)"
            }
            TemplateKey::ReservationHeader => "{start_date} - {end_date} ({nights} noches, {guests})",
            TemplateKey::ReservationUnitsTitle => "_Unidades:_",
            TemplateKey::ReservationUnit => "🟠 {name} || {price} / noche [{subtotal}]",
            TemplateKey::ReservationUnitDiscount => {
                "🟠 {name} || {price} / noche ({discount}% descuento aplicado) [{subtotal}]"
            }
            TemplateKey::ReservationServicesTitle => "_Servicios:_",
            TemplateKey::ReservationService => {
                "⚪ {name} || {price} / persona / día ({code}) [{subtotal}]"
            }
            TemplateKey::ReservationTotal => "*Total:* _{total}_",
            TemplateKey::ReservationDeposit => "*Seña:* _{deposit}_",
        }
    }
}

impl fmt::Display for TemplateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Values for one substitution.
///
/// A variable set to `None` renders as the empty string. Placeholders with no
/// matching variable stay in the text untouched.
#[derive(Debug, Clone, Default)]
pub struct TemplateVars {
    values: HashMap<String, String>,
}

impl TemplateVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, name: &str, value: impl ToString) -> Self {
        self.values.insert(name.to_string(), value.to_string());
        self
    }

    pub fn set_opt<T: ToString>(mut self, name: &str, value: Option<T>) -> Self {
        let value = value.map(|v| v.to_string()).unwrap_or_default();
        self.values.insert(name.to_string(), value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }
}

/// Replace every `{name}` placeholder with its value in a single pass.
///
/// Matching is exact and case-sensitive. Substituted values are never
/// rescanned, so a value containing `{other}` is emitted literally.
pub fn replace_variables(template: &str, vars: &TemplateVars) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        let token_end = after.find(|c: char| c == '}' || c == '{');
        match token_end {
            Some(end) if after[end..].starts_with('}') => {
                let name = &after[..end];
                match vars.get(name) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[end + 1..];
            }
            _ => {
                // Stray brace; keep it and continue after it
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Template contents keyed by `template_type`, as fetched for one composition.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateSet {
    contents: HashMap<String, String>,
}

impl TemplateSet {
    pub fn from_templates(templates: impl IntoIterator<Item = MessageTemplate>) -> Self {
        Self {
            contents: templates
                .into_iter()
                .map(|t| (t.template_type, t.content))
                .collect(),
        }
    }

    /// Every key with its built-in content.
    pub fn defaults() -> Self {
        Self {
            contents: TemplateKey::ALL
                .into_iter()
                .map(|k| (k.as_str().to_string(), k.default_content().to_string()))
                .collect(),
        }
    }

    pub fn with(mut self, key: TemplateKey, content: impl Into<String>) -> Self {
        self.contents.insert(key.as_str().to_string(), content.into());
        self
    }

    pub fn without(mut self, key: TemplateKey) -> Self {
        self.contents.remove(key.as_str());
        self
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    pub fn get(&self, key: TemplateKey) -> Result<&str> {
        self.contents
            .get(key.as_str())
            .map(String::as_str)
            .ok_or_else(|| AppError::MissingTemplateKey(key.as_str().to_string()))
    }

    pub fn render(&self, key: TemplateKey, vars: &TemplateVars) -> Result<String> {
        Ok(replace_variables(self.get(key)?, vars))
    }

    /// Keys the composer needs that this set does not define.
    pub fn missing_keys(&self) -> Vec<TemplateKey> {
        TemplateKey::ALL
            .into_iter()
            .filter(|k| !self.contents.contains_key(k.as_str()))
            .collect()
    }
}
