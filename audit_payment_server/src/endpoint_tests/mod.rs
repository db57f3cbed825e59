mod helpers;

mod create_order;
mod verify_payment;
