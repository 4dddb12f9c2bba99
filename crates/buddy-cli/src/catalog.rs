//! Product catalog
//!
//! A static, read-only data set. Browsing is linear filtering and sorting
//! over the in-memory list; there is no product database.

use std::sync::LazyLock;

use buddy_assistant::ConversationContext;

/// One catalog entry
#[derive(Debug, Clone)]
pub struct Product {
    pub id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub price: f64,
    pub description: &'static str,
}

impl Product {
    /// Conversation context for a viewed product
    pub fn context(&self) -> ConversationContext {
        ConversationContext::for_product(self.id, self.name, self.category)
    }
}

static CATALOG: LazyLock<Vec<Product>> = LazyLock::new(|| {
    vec![
        Product {
            id: "cpu-7800x3d",
            name: "AMD Ryzen 7 7800X3D",
            category: "processors",
            price: 415.0,
            description: "8-core gaming CPU with 3D V-Cache",
        },
        Product {
            id: "cpu-5600",
            name: "AMD Ryzen 5 5600",
            category: "processors",
            price: 135.0,
            description: "6-core AM4 CPU",
        },
        Product {
            id: "cpu-14700k",
            name: "Intel Core i7-14700K",
            category: "processors",
            price: 395.0,
            description: "20-core hybrid desktop CPU",
        },
        Product {
            id: "gpu-4070",
            name: "RTX 4070",
            category: "graphics-cards",
            price: 899.99,
            description: "12GB GDDR6X graphics card",
        },
        Product {
            id: "gpu-4060",
            name: "RTX 4060",
            category: "graphics-cards",
            price: 459.0,
            description: "8GB GDDR6 graphics card",
        },
        Product {
            id: "gpu-7800xt",
            name: "Radeon RX 7800 XT",
            category: "graphics-cards",
            price: 689.0,
            description: "16GB GDDR6 graphics card",
        },
        Product {
            id: "mb-b650",
            name: "MSI B650 Tomahawk",
            category: "motherboards",
            price: 219.0,
            description: "AM5 ATX motherboard",
        },
        Product {
            id: "ram-ddr5-32",
            name: "Corsair Vengeance 32GB DDR5-6000",
            category: "memory",
            price: 145.0,
            description: "2x16GB DDR5 kit",
        },
        Product {
            id: "ssd-980pro-2tb",
            name: "Samsung 980 Pro 2TB",
            category: "storage",
            price: 179.0,
            description: "PCIe 4.0 NVMe SSD",
        },
        Product {
            id: "psu-rm850x",
            name: "Corsair RM850x",
            category: "power-supplies",
            price: 139.0,
            description: "850W 80+ Gold modular PSU",
        },
        Product {
            id: "case-4000d",
            name: "Corsair 4000D Airflow",
            category: "cases",
            price: 95.0,
            description: "Mid-tower ATX case",
        },
        Product {
            id: "kb-mech-tkl",
            name: "Mechanical Keyboard TKL",
            category: "peripherals",
            price: 45.0,
            description: "Tenkeyless mechanical keyboard",
        },
    ]
});

/// All catalog products
pub fn all() -> &'static [Product] {
    &CATALOG
}

/// Look up a product by id
pub fn get(id: &str) -> Option<&'static Product> {
    CATALOG.iter().find(|p| p.id == id)
}

/// Products in a category
pub fn by_category(category: &str) -> Vec<&'static Product> {
    CATALOG.iter().filter(|p| p.category == category).collect()
}

/// Case-insensitive substring search over names and descriptions
pub fn search(query: &str) -> Vec<&'static Product> {
    let query = query.to_lowercase();
    CATALOG
        .iter()
        .filter(|p| {
            p.name.to_lowercase().contains(&query) || p.description.to_lowercase().contains(&query)
        })
        .collect()
}

/// Products sorted by ascending price
pub fn sorted_by_price(mut products: Vec<&'static Product>) -> Vec<&'static Product> {
    products.sort_by(|a, b| a.price.total_cmp(&b.price));
    products
}
