//! Output formatting for the CLI.

use console::style;
use market_cart::CartState;

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a table row.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        let formatted: Vec<String> = cols
            .iter()
            .zip(widths.iter())
            .map(|(col, width)| format!("{:width$}", col, width = width))
            .collect();
        println!("  {}", formatted.join("  "));
    }

    /// Print the cart, as a table or as the snapshot JSON.
    pub fn cart(&self, cart: &CartState) {
        if self.json {
            self.json(&cart.items());
            return;
        }

        self.header("Cart");
        if cart.is_empty() {
            self.info("Cart is empty.");
            return;
        }

        let widths = column_widths(cart);
        self.table_row(&["ID", "TITLE", "PRICE", "QTY"], &widths);
        for item in cart {
            self.table_row(
                &[
                    item.id.as_str(),
                    &item.title,
                    &format_price(item.unit_price),
                    &item.quantity.to_string(),
                ],
                &widths,
            );
        }
        println!();
        self.kv("products", &cart.len().to_string());
        self.kv("items", &cart.item_count().to_string());
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }
}

fn column_widths(cart: &CartState) -> [usize; 4] {
    let mut widths = [2, 5, 5, 3];
    for item in cart {
        widths[0] = widths[0].max(item.id.as_str().chars().count());
        widths[1] = widths[1].max(item.title.chars().count());
        widths[2] = widths[2].max(format_price(item.unit_price).len());
    }
    widths
}

/// Format a unit price with two decimals.
pub fn format_price(price: f64) -> String {
    format!("{:.2}", price)
}
