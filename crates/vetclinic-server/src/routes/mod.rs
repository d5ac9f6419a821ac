//! Resource routers mounted under `/api`.

mod appointments;
mod auth;
mod clients;
mod dashboard;
mod demo;
mod invoices;
mod pets;
mod treatments;
mod veterinarians;

pub use dashboard::summary as dashboard;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn api_router() -> Router<AppState> {
    Router::new()
        .route("/clientes", get(clients::list).post(clients::create))
        .route(
            "/clientes/:id",
            get(clients::show).put(clients::update).delete(clients::destroy),
        )
        .route("/mascotas", get(pets::list).post(pets::create))
        .route(
            "/mascotas/:id",
            get(pets::show).put(pets::update).delete(pets::destroy),
        )
        .route(
            "/veterinarios",
            get(veterinarians::list).post(veterinarians::create),
        )
        .route(
            "/veterinarios/:id",
            get(veterinarians::show)
                .put(veterinarians::update)
                .delete(veterinarians::destroy),
        )
        .route("/especialidades", get(veterinarians::specialties))
        .route("/citas", get(appointments::list).post(appointments::create))
        .route(
            "/citas/:id",
            get(appointments::show)
                .put(appointments::update)
                .patch(appointments::update)
                .delete(appointments::destroy),
        )
        .route(
            "/tratamientos",
            get(treatments::list).post(treatments::create),
        )
        .route(
            "/tratamientos/:id",
            get(treatments::show)
                .put(treatments::update)
                .delete(treatments::destroy),
        )
        .route("/facturas", get(invoices::list).post(invoices::create))
        .route(
            "/facturas/:id",
            get(invoices::show)
                .put(invoices::update)
                .delete(invoices::destroy),
        )
        .route(
            "/alumnos",
            get(demo::list_students).post(demo::create_student),
        )
        .route(
            "/alumnos/:id",
            get(demo::show_student)
                .put(demo::update_student)
                .delete(demo::destroy_student),
        )
        .route("/animales", get(demo::list_animals).post(demo::create_animal))
        .route(
            "/animales/:id",
            get(demo::show_animal)
                .put(demo::update_animal)
                .delete(demo::destroy_animal),
        )
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/session", get(auth::session))
}
