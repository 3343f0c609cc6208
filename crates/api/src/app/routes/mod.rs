use axum::Router;

pub mod authors;
pub mod book_sales;
pub mod books;
pub mod common;
pub mod customers;
pub mod order_items;
pub mod orders;
pub mod reports;
pub mod system;

/// Router for every catalog endpoint (all of them run inside the envelope).
pub fn router() -> Router {
    Router::new()
        .nest("/authors", authors::router())
        .nest("/books", books::router())
        .nest("/customers", customers::router())
        .nest("/orders", orders::router())
        .nest("/order-items", order_items::router())
        .nest("/book-sales", book_sales::router())
        .nest("/reports", reports::router())
}
