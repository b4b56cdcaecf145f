pub mod likes_service;
