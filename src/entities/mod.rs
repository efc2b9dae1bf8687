// ABOUTME: SeaORM entities module for database models and relationships
// ABOUTME: Exports entity definitions for profiles, payment methods and social connections

pub mod payment_method;
pub mod profile;
pub mod social_connection;

pub use payment_method::Entity as PaymentMethod;
pub use profile::Entity as Profile;
pub use social_connection::Entity as SocialConnection;
