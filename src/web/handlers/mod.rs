pub mod cover_letter_handlers;
pub mod photo_handlers;
pub mod resume_handlers;
pub mod review_handlers;
pub mod system_handlers;

pub use cover_letter_handlers::*;
pub use photo_handlers::*;
pub use resume_handlers::*;
pub use review_handlers::*;
pub use system_handlers::*;
