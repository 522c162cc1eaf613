
//---------------------------------------
pub mod web_api {
    pub mod api_error;
    pub mod routes;
    pub mod controllers {
        pub mod health_controller;
        pub mod todo_controller;
    }
}

pub use web_api::routes::{build_router, map_routes};
pub use web_api::controllers::*;
//---------------------------------------

//---------------------------------------
pub mod shared {
    pub mod models;
    pub mod dto;
}

pub use shared::models::*;
pub use shared::dto::*;
//---------------------------------------

//---------------------------------------
pub mod data_access {
    pub mod data_context;
}
//---------------------------------------

//---------------------------------------
pub mod image_acquisition {
    pub mod acquirer;
    pub mod error;
    pub mod generator;
}

pub use image_acquisition::acquirer::{ImageAcquirer, ImageSource};
//---------------------------------------

//---------------------------------------
pub mod client {
    pub mod api;
    pub mod board;
    pub mod image_view;
}
//---------------------------------------
