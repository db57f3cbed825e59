//! Concrete [`audit_payment_engine::traits::PaymentGateway`] implementations: the Razorpay client for production,
//! and a store-backed stand-in for test mode.

mod razorpay;
mod test_mode;

pub use razorpay::RazorpayGateway;
pub use test_mode::TestModeGateway;
