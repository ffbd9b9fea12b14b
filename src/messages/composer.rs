//! WhatsApp-ready availability and reservation messages.
//!
//! Both entry points fetch the template set once from the injected provider,
//! then assemble the text synchronously. Any missing template key fails the
//! whole message.

use rust_decimal::Decimal;

use crate::error::Result;
use crate::pricing::MoneyFormat;

use super::provider::TemplateProvider;
use super::quote::{AvailabilityQuote, ReservationQuote, ServiceOffer, StayDetails};
use super::template::{TemplateKey, TemplateSet, TemplateVars};

const DATE_FORMAT: &str = "%d/%m";

pub struct MessageComposer<P> {
    provider: P,
    money: MoneyFormat,
}

impl<P: TemplateProvider> MessageComposer<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            money: MoneyFormat::default(),
        }
    }

    pub fn with_money_format(mut self, money: MoneyFormat) -> Self {
        self.money = money;
        self
    }

    pub async fn availability_message(&self, quote: &AvailabilityQuote) -> Result<String> {
        let templates = self.provider.fetch_templates().await?;
        let message = render_availability(&templates, &self.money, quote)?;
        tracing::debug!(
            units = quote.units.len(),
            services = quote.services.len(),
            "Composed availability message"
        );
        Ok(message)
    }

    pub async fn reservation_message(&self, quote: &ReservationQuote) -> Result<String> {
        let templates = self.provider.fetch_templates().await?;
        let message = render_reservation(&templates, &self.money, quote)?;
        tracing::debug!(
            units = quote.units.len(),
            services = quote.services.len(),
            "Composed reservation message"
        );
        Ok(message)
    }
}

/// Percentages print without trailing zeros: `10`, `12.5`.
fn percent(value: Decimal) -> String {
    value.normalize().to_string()
}

fn stay_vars(stay: &StayDetails) -> TemplateVars {
    TemplateVars::new()
        .set("start_date", stay.check_in.format(DATE_FORMAT))
        .set("end_date", stay.check_out.format(DATE_FORMAT))
        .set("nights", stay.nights)
        .set("guests", stay.guests.describe())
        .set("total_guests", stay.guests.total())
        .set("adults", stay.guests.adults)
        .set("children", stay.guests.children)
}

fn service_price_text(money: &MoneyFormat, service: &ServiceOffer) -> String {
    match service.child_price {
        Some(child) => format!(
            "adultos {}, niños {}",
            money.format(service.adult_price),
            money.format(child)
        ),
        None => money.format(service.adult_price),
    }
}

pub fn render_availability(
    templates: &TemplateSet,
    money: &MoneyFormat,
    quote: &AvailabilityQuote,
) -> Result<String> {
    let mut message = String::new();

    for promo in &quote.promotions {
        let vars = TemplateVars::new()
            .set("min_nights", promo.min_nights)
            .set("discount", percent(promo.percentage))
            .set("description", &promo.description);
        message += &templates.render(TemplateKey::AvailabilityHeader, &vars)?;
        message.push('\n');
    }
    if !quote.promotions.is_empty() {
        message.push('\n');
    }

    message += &templates.render(TemplateKey::AvailabilityGuestInfo, &stay_vars(&quote.stay))?;
    message.push('\n');

    for unit in &quote.units {
        let line = match &unit.discount {
            Some(discount) => {
                let vars = TemplateVars::new()
                    .set("name", &unit.name)
                    .set("price", money.format(discount.price_per_night))
                    .set("original_price", money.format(unit.price_per_night))
                    .set("discount", percent(discount.percentage));
                templates.render(TemplateKey::AvailabilityUnitDiscount, &vars)?
            }
            None => {
                let vars = TemplateVars::new()
                    .set("name", &unit.name)
                    .set("price", money.format(unit.price_per_night));
                templates.render(TemplateKey::AvailabilityUnit, &vars)?
            }
        };
        message += &line;
        message.push('\n');
    }
    message.push('\n');

    for service in &quote.services {
        let mode = if service.per_day {
            "por persona / día"
        } else {
            "por persona"
        };
        let vars = TemplateVars::new()
            .set("name", &service.name)
            .set("price", service_price_text(money, service))
            .set("mode", mode)
            .set_opt("description", service.description.as_deref());
        message += &templates.render(TemplateKey::AvailabilityService, &vars)?;
        message.push('\n');
        if let Some(description) = service.description.as_deref().filter(|d| !d.is_empty()) {
            message += description;
            message.push('\n');
        }
        message.push('\n');
    }

    let vars = TemplateVars::new().set("deposit", percent(quote.deposit_percentage));
    message += &templates.render(TemplateKey::AvailabilityFooter, &vars)?;
    message.push('\n');

    Ok(message)
}

pub fn render_reservation(
    templates: &TemplateSet,
    money: &MoneyFormat,
    quote: &ReservationQuote,
) -> Result<String> {
    let mut message = templates.render(TemplateKey::ReservationHeader, &stay_vars(&quote.stay))?;
    message += "\n\n";

    if !quote.units.is_empty() {
        message += &templates.render(TemplateKey::ReservationUnitsTitle, &TemplateVars::new())?;
        message.push('\n');
        for unit in &quote.units {
            let vars = TemplateVars::new()
                .set("name", &unit.name)
                .set("nights", unit.nights)
                .set("price", money.format(unit.price_per_night))
                .set("subtotal", money.format(unit.subtotal));
            let line = match unit.discount_percentage {
                Some(pct) => templates.render(
                    TemplateKey::ReservationUnitDiscount,
                    &vars.set("discount", percent(pct)),
                )?,
                None => templates.render(TemplateKey::ReservationUnit, &vars)?,
            };
            message += &line;
            message.push('\n');
        }
        message.push('\n');
    }

    if !quote.services.is_empty() {
        message += &templates.render(TemplateKey::ReservationServicesTitle, &TemplateVars::new())?;
        message.push('\n');
        for service in &quote.services {
            let vars = TemplateVars::new()
                .set("name", &service.name)
                .set("price", money.format(service.price_per_person))
                .set("code", service.guest_code())
                .set("adults", service.adults)
                .set("children", service.children)
                .set("days", service.days)
                .set("subtotal", money.format(service.subtotal));
            message += &templates.render(TemplateKey::ReservationService, &vars)?;
            message.push('\n');
        }
        message.push('\n');
    }

    let vars = TemplateVars::new().set("total", money.format(quote.total));
    message += &templates.render(TemplateKey::ReservationTotal, &vars)?;
    message.push('\n');

    let vars = TemplateVars::new()
        .set("deposit", money.format(quote.deposit))
        .set("deposit_percentage", percent(quote.deposit_percentage));
    message += &templates.render(TemplateKey::ReservationDeposit, &vars)?;
    message.push('\n');

    Ok(message)
}
