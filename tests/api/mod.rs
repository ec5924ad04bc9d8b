mod auth_tests;
mod client_flow_tests;
mod health_tests;
mod session_tests;
mod sweep_tests;
