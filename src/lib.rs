//! Backend de anuncios de alquiler
//!
//! Registro y login de usuarios, CRUD de propiedades con búsqueda filtrada y
//! paginada, favoritos y recomendaciones entre usuarios. Las lecturas pasan
//! por un cache Redis con invalidación por generación de listados.

pub mod cache;
pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
