//! Rental service

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::rent::{parse_date_until, ActiveRent, Checkout},
    repository::Repository,
};

/// Checkout request fields as received, before validation
#[derive(Debug, Clone)]
pub struct CheckoutInput {
    pub client_id: i64,
    pub stock_id: i64,
    pub date_until: String,
    pub rent_qty: i64,
}

#[derive(Clone)]
pub struct RentsService {
    repository: Repository,
}

/// Validate the raw fields of a checkout. Nothing here touches the database.
pub fn validate_checkout(input: &CheckoutInput, now: chrono::DateTime<Utc>) -> AppResult<Checkout> {
    let client_id = positive_id(input.client_id, "clientId")?;
    let stock_id = positive_id(input.stock_id, "stockId")?;
    if input.rent_qty < 1 {
        return Err(AppError::Validation("rentQty must be >= 1".to_string()));
    }
    let rent_qty = i32::try_from(input.rent_qty).map_err(|_| AppError::missing("rentQty"))?;
    let date_until = parse_date_until(&input.date_until, now)?;

    Ok(Checkout {
        client_id,
        stock_id,
        date_until,
        rent_qty,
    })
}

fn positive_id(value: i64, key: &str) -> AppResult<i32> {
    match i32::try_from(value) {
        Ok(id) if id >= 1 => Ok(id),
        _ => Err(AppError::missing(key)),
    }
}

impl RentsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Rent copies out of a stock bucket
    pub async fn checkout(&self, input: CheckoutInput) -> AppResult<i32> {
        let now = Utc::now();
        let checkout = validate_checkout(&input, now)?;

        match self.repository.rents.checkout(&checkout, now).await {
            Ok(rentid) => {
                tracing::info!(
                    rentid,
                    stockid = checkout.stock_id,
                    clientid = checkout.client_id,
                    rentqty = checkout.rent_qty,
                    "Checkout recorded"
                );
                Ok(rentid)
            }
            Err(e @ AppError::Conflict(_)) => {
                tracing::warn!(
                    stockid = checkout.stock_id,
                    rentqty = checkout.rent_qty,
                    "Checkout refused: not enough copies"
                );
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Close an active rental
    pub async fn return_rent(&self, rent_id: i64) -> AppResult<()> {
        let rentid = positive_id(rent_id, "rentId")?;
        self.repository.rents.mark_returned(rentid, Utc::now()).await?;
        tracing::info!(rentid, "Rent returned");
        Ok(())
    }

    pub async fn list_active_by_client(&self, client_id: i64) -> AppResult<Vec<ActiveRent>> {
        let clientid = positive_id(client_id, "clientId")?;
        self.repository.rents.list_active_by_client(clientid).await
    }

    pub async fn list_active(&self) -> AppResult<Vec<ActiveRent>> {
        self.repository.rents.list_active().await
    }
}
