/// Rejected checkout request. The UI state is left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CheckoutError {
    /// Payment was submitted without a selected payment method.
    #[error("No payment method is selected")]
    NotReady,

    /// A payment is already in flight.
    #[error("A payment is already being processed")]
    AlreadyProcessing,

    #[error("Item quantity must be at least 1")]
    InvalidQuantity,
}
