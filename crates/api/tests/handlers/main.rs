#[path = "../test_utils.rs"]
mod test_utils;

mod appointments_test;
mod chat_test;
mod events_test;
mod functions_test;
mod gamification_test;
mod health_test;
mod middleware_test;
mod slots_test;
mod templates_test;
