//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use tracing::instrument;

use crate::catalog;
use crate::filters;
use crate::routes::cart::format_price;

// =============================================================================
// Review Data
// =============================================================================

/// A customer testimonial for display on the homepage.
#[derive(Clone)]
pub struct TestimonialView {
    pub reviewer_name: String,
    pub stars: String,
    pub comment: String,
}

impl TestimonialView {
    fn new(reviewer_name: &str, rating: usize, comment: &str) -> Self {
        Self {
            reviewer_name: reviewer_name.to_string(),
            stars: "\u{2b50}".repeat(rating),
            comment: comment.to_string(),
        }
    }
}

/// Static testimonials for the homepage.
fn featured_testimonials() -> Vec<TestimonialView> {
    vec![
        TestimonialView::new(
            "John Doe",
            5,
            "Great shoes! Very comfortable and stylish.",
        ),
        TestimonialView::new("Jane Smith", 4, "Good quality and fast shipping."),
    ]
}

// =============================================================================
// Product Views
// =============================================================================

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductCardView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub image_url: String,
}

impl From<&catalog::Product> for ProductCardView {
    fn from(product: &catalog::Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: format_price(product.price),
            image_url: product.image_url.clone(),
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    /// Featured products for the carousel grid.
    pub products: Vec<ProductCardView>,
    /// Customer testimonials.
    pub testimonials: Vec<TestimonialView>,
}

/// Display the home page.
#[instrument]
pub async fn home() -> HomeTemplate {
    let products = catalog::all().iter().map(ProductCardView::from).collect();

    HomeTemplate {
        products,
        testimonials: featured_testimonials(),
    }
}
