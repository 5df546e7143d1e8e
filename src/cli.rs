//! Interactive text menu.
//!
//! All parsing of user input lives here: the core only ever sees typed
//! values. Prompts re-ask until the input parses, and end of input quits
//! the menu from wherever it is.

use crate::error::InventoryError;
use crate::repository::ProductRepository;
use crate::service::ProductService;
use crate::types::{Category, Price, MAX_NAME_LEN, MIN_NAME_LEN};
use chrono::NaiveDate;
use console::style;
use std::io::{self, BufRead, ErrorKind, Write};
use std::str::FromStr;

/// Line-oriented prompt reader over any input/output pair.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Print `prompt` and read one trimmed line. Fails with `UnexpectedEof`
    /// once input is exhausted.
    fn line(&mut self, prompt: &str) -> io::Result<String> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Err(io::Error::new(ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(buf.trim().to_string())
    }

    fn success(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{} {}", style("[OK]").green().bold(), message)
    }

    fn error(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{} {}", style("[ERROR]").red().bold(), message)
    }

    /// Ask until `parse` accepts the line.
    fn ask<T>(
        &mut self,
        prompt: &str,
        complaint: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> io::Result<T> {
        loop {
            let line = self.line(prompt)?;
            match parse(&line) {
                Some(value) => return Ok(value),
                None => self.error(complaint)?,
            }
        }
    }

    pub fn required_string(&mut self, prompt: &str) -> io::Result<String> {
        self.ask(prompt, "This field is required.", |s| {
            (!s.is_empty()).then(|| s.to_string())
        })
    }

    /// Decimal with `.` as separator.
    pub fn decimal(&mut self, prompt: &str) -> io::Result<Price> {
        self.ask(
            prompt,
            "Invalid decimal. Use '.' as separator (e.g. 10.99).",
            |s| Price::from_str(s).ok(),
        )
    }

    pub fn integer(&mut self, prompt: &str) -> io::Result<i64> {
        self.ask(prompt, "Invalid integer (e.g. 10).", |s| s.parse().ok())
    }

    /// List categories and ask for one by 1-based number.
    pub fn category(&mut self, prompt: &str) -> io::Result<Category> {
        writeln!(self.output, "{}", prompt)?;
        for (i, category) in Category::ALL.iter().enumerate() {
            writeln!(self.output, "  {}: {}", i + 1, category)?;
        }
        self.ask("Pick a number: ", "Invalid category choice.", |s| {
            s.parse::<usize>()
                .ok()
                .filter(|n| (1..=Category::ALL.len()).contains(n))
                .map(|n| Category::ALL[n - 1])
        })
    }

    /// `YYYY-MM-DD`, or blank for none.
    pub fn optional_date(&mut self, prompt: &str) -> io::Result<Option<NaiveDate>> {
        self.ask(prompt, "Invalid date. Use YYYY-MM-DD or leave blank.", |s| {
            if s.is_empty() {
                Some(None)
            } else {
                NaiveDate::parse_from_str(s, "%Y-%m-%d").ok().map(Some)
            }
        })
    }
}

/// Run the menu until the user quits or input ends.
pub fn run<Repo, R, W>(service: &ProductService<Repo>, prompter: &mut Prompter<R, W>) -> io::Result<()>
where
    Repo: ProductRepository,
    R: BufRead,
    W: Write,
{
    match menu_loop(service, prompter) {
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => Ok(()),
        other => other,
    }
}

fn menu_loop<Repo, R, W>(service: &ProductService<Repo>, p: &mut Prompter<R, W>) -> io::Result<()>
where
    Repo: ProductRepository,
    R: BufRead,
    W: Write,
{
    writeln!(p.output, "=== Stockroom inventory ===")?;

    loop {
        writeln!(p.output)?;
        writeln!(p.output, "--- MENU ---")?;
        writeln!(p.output, "1: List all products")?;
        writeln!(p.output, "2: Register new product")?;
        writeln!(p.output, "3: Remove stock")?;
        writeln!(p.output, "4: Add stock")?;
        writeln!(p.output, "0: Quit")?;

        let choice = p.line("Choose an option: ")?;
        match choice.as_str() {
            "1" => list_products(service, p)?,
            "2" => create_product(service, p)?,
            "3" => adjust_stock(service, p, Adjustment::Decrease)?,
            "4" => adjust_stock(service, p, Adjustment::Increase)?,
            "0" => {
                writeln!(p.output, "Goodbye.")?;
                return Ok(());
            }
            _ => p.error("Invalid option. Try again.")?,
        }
    }
}

fn list_products<Repo, R, W>(service: &ProductService<Repo>, p: &mut Prompter<R, W>) -> io::Result<()>
where
    Repo: ProductRepository,
    R: BufRead,
    W: Write,
{
    match service.list_products() {
        Ok(products) if products.is_empty() => writeln!(p.output, "No products registered."),
        Ok(products) => {
            for product in products {
                writeln!(p.output, "{}", product)?;
            }
            Ok(())
        }
        Err(e) => report(p, e),
    }
}

fn create_product<Repo, R, W>(service: &ProductService<Repo>, p: &mut Prompter<R, W>) -> io::Result<()>
where
    Repo: ProductRepository,
    R: BufRead,
    W: Write,
{
    let sku = p.required_string("SKU (barcode): ")?;
    let name = p.required_string(&format!("Name ({}-{} characters): ", MIN_NAME_LEN, MAX_NAME_LEN))?;
    let price = p.decimal("Sale price (e.g. 29.99): ")?;
    let stock = p.integer("Initial stock (e.g. 50): ")?;
    let category = p.category("Category:")?;
    let expiry = p.optional_date("Expiry date (YYYY-MM-DD, blank for none): ")?;

    match service.create_product(&sku, &name, price, stock, category, expiry) {
        Ok(id) => p.success(&format!("Product '{}' (ID: {}) registered.", name, id)),
        Err(e) => report(p, e),
    }
}

enum Adjustment {
    Decrease,
    Increase,
}

fn adjust_stock<Repo, R, W>(
    service: &ProductService<Repo>,
    p: &mut Prompter<R, W>,
    adjustment: Adjustment,
) -> io::Result<()>
where
    Repo: ProductRepository,
    R: BufRead,
    W: Write,
{
    let sku = p.required_string("Product SKU: ")?;
    let quantity = p.integer("Quantity (e.g. 5): ")?;

    let result = match adjustment {
        Adjustment::Decrease => service.decrease_stock(&sku, quantity),
        Adjustment::Increase => service.increase_stock(&sku, quantity),
    };

    match result {
        Ok(product) => p.success(&format!("Stock updated. New stock: {}", product.stock())),
        Err(e) => report(p, e),
    }
}

/// Show a failed operation. I/O failures from the store are shown too; the
/// menu keeps running.
fn report<R: BufRead, W: Write>(p: &mut Prompter<R, W>, error: InventoryError) -> io::Result<()> {
    p.error(&error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryProductRepository;
    use std::io::Cursor;

    fn prompter(input: &str) -> Prompter<Cursor<Vec<u8>>, Vec<u8>> {
        Prompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    fn output(p: Prompter<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(p.into_output()).unwrap()
    }

    #[test]
    fn test_decimal_reprompts() {
        let mut p = prompter("abc\n10,5\n10.99\n");
        let value = p.decimal("Price: ").unwrap();
        assert_eq!(value, Price::new(1099, 2));

        let text = output(p);
        assert_eq!(text.matches("Invalid decimal").count(), 2);
    }

    #[test]
    fn test_required_string_reprompts() {
        let mut p = prompter("\n   \nabc\n");
        assert_eq!(p.required_string("SKU: ").unwrap(), "abc");
        assert_eq!(output(p).matches("required").count(), 2);
    }

    #[test]
    fn test_category_by_number() {
        let mut p = prompter("0\n8\n3\n");
        assert_eq!(p.category("Category:").unwrap(), Category::Bakery);
    }

    #[test]
    fn test_optional_date() {
        let mut p = prompter("\n2030-02-30\n2030-02-28\n");
        assert_eq!(p.optional_date("Expiry: ").unwrap(), None);
        assert_eq!(
            p.optional_date("Expiry: ").unwrap(),
            NaiveDate::from_ymd_opt(2030, 2, 28)
        );
    }

    #[test]
    fn test_eof_is_error() {
        let mut p = prompter("");
        let err = p.integer("Qty: ").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_menu_session() {
        let service = ProductService::new(InMemoryProductRepository::new());
        let script = "\
2\n123\nNew Product\n10\n10\n3\n\n\
3\n123\n7\n\
3\n123\n6\n\
4\n123\n1\n\
1\n\
9\n\
0\n";
        let mut p = prompter(script);

        run(&service, &mut p).unwrap();

        let text = output(p);
        assert!(text.contains("Product 'New Product'"));
        assert!(text.contains("New stock: 3"));
        assert!(text.contains("Insufficient stock: available 3, requested 6"));
        assert!(text.contains("New stock: 4"));
        assert!(text.contains("Sku=123"));
        assert!(text.contains("Invalid option"));
        assert!(text.contains("Goodbye."));
        assert_eq!(service.find_by_sku("123").unwrap().unwrap().stock(), 4);
    }

    #[test]
    fn test_menu_ends_on_eof() {
        let service = ProductService::new(InMemoryProductRepository::new());
        let mut p = prompter("1\n2\n123\n");

        assert!(run(&service, &mut p).is_ok());
        assert!(service.list_products().unwrap().is_empty());
    }
}
