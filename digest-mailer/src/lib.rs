pub mod mail;
pub mod render;

pub use mail::Mailer;
pub use render::render_digest;
