//! Fixtures shared by the command tests.

use fizz_core::{Money, Product, ProductDraft, SizeVariant};

use crate::Terminal;

pub(crate) async fn terminal() -> Terminal {
    Terminal::in_memory().await.expect("in-memory terminal")
}

pub(crate) fn soda_draft(stock: i64) -> ProductDraft {
    ProductDraft {
        name: "Fruity Soda".to_string(),
        sku: "FS001".to_string(),
        description: Some("Refreshing fruity soda".to_string()),
        category: "Customizable".to_string(),
        price_cents: 2500,
        stock,
        is_customizable: true,
        flavors: vec!["Lychee".to_string(), "Mango".to_string()],
        sizes: vec![
            SizeVariant::new("12oz", Money::from_cents(2500), "Small"),
            SizeVariant::new("16oz", Money::from_cents(3500), "Medium"),
        ],
        image: None,
    }
}

pub(crate) fn plain_draft(sku: &str, name: &str, price_cents: i64, stock: i64) -> ProductDraft {
    ProductDraft {
        name: name.to_string(),
        sku: sku.to_string(),
        category: "Snacks".to_string(),
        price_cents,
        stock,
        ..Default::default()
    }
}

pub(crate) async fn create(terminal: &Terminal, draft: ProductDraft) -> Product {
    terminal
        .db
        .inner()
        .products()
        .create(&draft)
        .await
        .expect("create product")
}
