//! Price estimate command.

use laundry_web::api::LaundryClient;

use super::{CommandError, Output};

/// Estimate the price of `quantity` pieces of `item_type`.
///
/// # Errors
///
/// Returns an error if the backend has no price for the item or cannot be
/// reached.
pub async fn estimate(
    client: &LaundryClient,
    output: &Output,
    item_type: &str,
    quantity: u32,
) -> Result<(), CommandError> {
    tracing::info!(item_type, quantity, "Requesting price estimate");
    let estimate = client.estimate_price(item_type, quantity).await?;

    output.emit(
        &estimate,
        &[format!("Estimated Cost: {}", estimate.estimated_price)],
    )
}
