//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use tracing::instrument;

use crate::catalog;
use crate::filters;
use crate::routes::cart::format_price;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub image_url: String,
}

impl From<&catalog::Product> for ProductView {
    fn from(product: &catalog::Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: format_price(product.price),
            image_url: product.image_url.clone(),
        }
    }
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub products: Vec<ProductView>,
}

/// Display the product listing.
#[instrument]
pub async fn index() -> ProductsIndexTemplate {
    ProductsIndexTemplate {
        products: catalog::all().iter().map(ProductView::from).collect(),
    }
}
