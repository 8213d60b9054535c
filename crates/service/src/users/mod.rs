pub mod json_repository;
pub mod repository;
pub mod service;

pub use json_repository::JsonUserRepository;
pub use repository::UserRepository;
pub use service::UserService;
