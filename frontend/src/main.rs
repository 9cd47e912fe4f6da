//! Frontend application entry point.

use explorer_frontend::app::App;

fn main() {
    #[cfg(not(feature = "server"))]
    dioxus::launch(App);

    #[cfg(feature = "server")]
    dioxus::serve(|| async move {
        use dioxus::server::axum;

        Ok(dioxus::server::router(App)
            .route("/_export_logs", axum::routing::get(explorer_backend::server_extra::export_logs)))
    });
}
