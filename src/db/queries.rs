//! Database queries against the reservation store.

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    AccommodationUnit, AdditionalService, BedType, MessageTemplate, PeriodExclusion, Promotion,
    PromotionUnit, ServicePrice, TariffPeriod, UnitPrice,
};

/// Get all tariff periods, earliest first
pub async fn list_tariff_periods(pool: &PgPool) -> Result<Vec<TariffPeriod>> {
    let periods = sqlx::query_as::<_, TariffPeriod>(
        r#"
        SELECT id, name, start_date, end_date, degree, deposit_percentage
        FROM tariff_periods
        ORDER BY start_date
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(periods)
}

/// Find units able to host a group
///
/// `bed_type` of `None` accepts any layout; otherwise the unit must match it
/// or be combinable.
pub async fn search_units(
    pool: &PgPool,
    total_guests: i32,
    with_children: bool,
    with_pets: bool,
    bed_type: Option<BedType>,
) -> Result<Vec<AccommodationUnit>> {
    let units = sqlx::query_as::<_, AccommodationUnit>(
        r#"
        SELECT
            id,
            name,
            description,
            min_capacity,
            max_capacity,
            COALESCE(allows_children, false) AS allows_children,
            COALESCE(allows_pets, false) AS allows_pets,
            COALESCE(bed_type, 'combinable') AS bed_type
        FROM accommodation_units
        WHERE max_capacity >= $1
          AND ($2 = false OR allows_children = true)
          AND ($3 = false OR allows_pets = true)
          AND ($4::text IS NULL OR bed_type = $4 OR bed_type = 'combinable')
        ORDER BY name
        "#,
    )
    .bind(total_guests)
    .bind(with_children)
    .bind(with_pets)
    .bind(bed_type.map(BedType::as_str))
    .fetch_all(pool)
    .await?;

    Ok(units)
}

/// Get units by id, ordered by name
pub async fn get_units_by_ids(pool: &PgPool, ids: &[Uuid]) -> Result<Vec<AccommodationUnit>> {
    let units = sqlx::query_as::<_, AccommodationUnit>(
        r#"
        SELECT
            id,
            name,
            description,
            min_capacity,
            max_capacity,
            COALESCE(allows_children, false) AS allows_children,
            COALESCE(allows_pets, false) AS allows_pets,
            COALESCE(bed_type, 'combinable') AS bed_type
        FROM accommodation_units
        WHERE id = ANY($1)
        ORDER BY name
        "#,
    )
    .bind(ids)
    .fetch_all(pool)
    .await?;

    Ok(units)
}

/// Get every unit, ordered by name
pub async fn list_units(pool: &PgPool) -> Result<Vec<AccommodationUnit>> {
    let units = sqlx::query_as::<_, AccommodationUnit>(
        r#"
        SELECT
            id,
            name,
            description,
            min_capacity,
            max_capacity,
            COALESCE(allows_children, false) AS allows_children,
            COALESCE(allows_pets, false) AS allows_pets,
            COALESCE(bed_type, 'combinable') AS bed_type
        FROM accommodation_units
        ORDER BY name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(units)
}

/// Get nightly prices, optionally restricted to some units
pub async fn list_unit_prices(pool: &PgPool, unit_ids: Option<&[Uuid]>) -> Result<Vec<UnitPrice>> {
    let prices = sqlx::query_as::<_, UnitPrice>(
        r#"
        SELECT unit_id, tariff_period_id, price_per_night
        FROM unit_prices
        WHERE unit_id IS NOT NULL
          AND tariff_period_id IS NOT NULL
          AND ($1::uuid[] IS NULL OR unit_id = ANY($1))
        ORDER BY created_at
        "#,
    )
    .bind(unit_ids)
    .fetch_all(pool)
    .await?;

    Ok(prices)
}

/// Get all additional services
pub async fn list_services(pool: &PgPool) -> Result<Vec<AdditionalService>> {
    let services = sqlx::query_as::<_, AdditionalService>(
        r#"
        SELECT
            id,
            name,
            description,
            COALESCE(requires_children_pricing, false) AS requires_children_pricing
        FROM additional_services
        ORDER BY name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(services)
}

/// Get all service prices
pub async fn list_service_prices(pool: &PgPool) -> Result<Vec<ServicePrice>> {
    let prices = sqlx::query_as::<_, ServicePrice>(
        r#"
        SELECT service_id, tariff_period_id, adult_price, child_price, per_day
        FROM service_prices
        WHERE service_id IS NOT NULL
          AND tariff_period_id IS NOT NULL
        ORDER BY created_at
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(prices)
}

/// Get all promotions
pub async fn list_promotions(pool: &PgPool) -> Result<Vec<Promotion>> {
    let promotions = sqlx::query_as::<_, Promotion>(
        r#"
        SELECT id, min_nights, discount_percentage, description, tariff_period_id
        FROM promotions
        ORDER BY min_nights, created_at
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(promotions)
}

/// Get promotion to unit links
pub async fn list_promotion_units(pool: &PgPool) -> Result<Vec<PromotionUnit>> {
    let links = sqlx::query_as::<_, PromotionUnit>(
        r#"
        SELECT promotion_id, unit_id
        FROM promotion_units
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(links)
}

/// Get units excluded from tariff periods
pub async fn list_period_exclusions(pool: &PgPool) -> Result<Vec<PeriodExclusion>> {
    let exclusions = sqlx::query_as::<_, PeriodExclusion>(
        r#"
        SELECT tariff_period_id, unit_id
        FROM period_excluded_units
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(exclusions)
}

/// Get all message templates
pub async fn list_message_templates(pool: &PgPool) -> Result<Vec<MessageTemplate>> {
    let templates = sqlx::query_as::<_, MessageTemplate>(
        r#"
        SELECT id, template_type, content, description, updated_at
        FROM message_templates
        ORDER BY template_type
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(templates)
}

/// Replace a template's content, returning the updated row
pub async fn update_message_template(
    pool: &PgPool,
    template_type: &str,
    content: &str,
) -> Result<Option<MessageTemplate>> {
    let template = sqlx::query_as::<_, MessageTemplate>(
        r#"
        UPDATE message_templates
        SET content = $2, updated_at = now()
        WHERE template_type = $1
        RETURNING id, template_type, content, description, updated_at
        "#,
    )
    .bind(template_type)
    .bind(content)
    .fetch_optional(pool)
    .await?;

    Ok(template)
}
