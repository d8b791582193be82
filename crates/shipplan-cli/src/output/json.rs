use shipplan_core::error::ShipplanError;
use shipplan_core::ShippingPlan;

/// A single plan prints as an object, several as an array.
pub fn print(plans: &[ShippingPlan]) -> Result<(), ShipplanError> {
    let json = match plans {
        [plan] => serde_json::to_string_pretty(plan)?,
        _ => serde_json::to_string_pretty(plans)?,
    };
    println!("{json}");
    Ok(())
}
