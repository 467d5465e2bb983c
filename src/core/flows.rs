//! Cross-service UI steps, expressed against the [`UiDriver`] capability
//! port. Selector strings are interpreted by the driver implementation;
//! `text=` targets an element by visible text, `row=` scopes a click to the
//! table row containing the given text.

use crate::domain::model::{ProductSpec, ServiceEndpoint};
use crate::domain::ports::UiDriver;
use crate::utils::error::{ProbeError, Result};

/// UI-based login for callers that drive a real browser. Request-based
/// sessions go through [`crate::adapters::http::FormLogin`] instead.
pub async fn log_in<D: UiDriver>(driver: &mut D, service: &ServiceEndpoint) -> Result<()> {
    let credentials =
        service
            .credentials
            .as_ref()
            .ok_or_else(|| ProbeError::MissingConfigError {
                field: format!("services.{}.username", service.name),
            })?;

    driver.navigate(&service.login_url()).await?;
    driver.fill_field("username", &credentials.username).await?;
    driver.fill_field("password", &credentials.password).await?;
    driver.click("button[type=submit]").await?;
    Ok(())
}

pub async fn create_product<D: UiDriver>(
    driver: &mut D,
    base_url: &str,
    product: &ProductSpec,
) -> Result<()> {
    driver.navigate(&products_url(base_url)).await?;
    driver.click("text=Create New Product").await?;
    driver.fill_field("type", &product.kind).await?;
    driver.fill_field("name", &product.name).await?;
    driver.fill_field("price", &product.price).await?;
    driver.fill_field("unit", &product.unit).await?;
    if let Some(description) = &product.description {
        driver.fill_field("description", description).await?;
    }
    driver.click("button[type=submit]").await?;

    let listing = driver.read_text("body").await?;
    if !listing.contains(&product.name) {
        return Err(ProbeError::DriverError {
            message: format!("product '{}' not visible after creation", product.name),
        });
    }
    Ok(())
}

pub async fn delete_product<D: UiDriver>(
    driver: &mut D,
    base_url: &str,
    product_name: &str,
) -> Result<()> {
    driver.navigate(&products_url(base_url)).await?;
    driver
        .click(&format!("row={} >> text=Delete", product_name))
        .await?;
    driver.click("button[type=submit]").await?;

    let listing = driver.read_text("body").await?;
    if listing.contains(product_name) {
        return Err(ProbeError::DriverError {
            message: format!("product '{}' still listed after deletion", product_name),
        });
    }
    Ok(())
}

pub async fn create_delivery_with_stock<D: UiDriver>(
    driver: &mut D,
    base_url: &str,
    sender: &str,
    product_name: &str,
    serial_number: &str,
) -> Result<()> {
    driver
        .navigate(&format!("{}/deliveries", base_url.trim_end_matches('/')))
        .await?;
    driver.fill_field("sender", sender).await?;
    driver.click("text=Create Delivery").await?;
    driver.click(&format!("row={} >> text=View", sender)).await?;
    driver.fill_field("productId", product_name).await?;
    driver.fill_field("serialNumber", serial_number).await?;
    driver.click("text=Add Item").await?;
    Ok(())
}

pub async fn add_product_to_cart<D: UiDriver>(
    driver: &mut D,
    base_url: &str,
    product_name: &str,
) -> Result<()> {
    driver.navigate(&products_url(base_url)).await?;
    driver
        .click(&format!("row={} >> text=Add to Cart", product_name))
        .await?;
    Ok(())
}

pub async fn checkout_cart<D: UiDriver>(driver: &mut D) -> Result<()> {
    driver.click("text=View Cart").await?;
    driver.click("text=Checkout").await?;
    Ok(())
}

fn products_url(base_url: &str) -> String {
    format!("{}/products", base_url.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Credentials;
    use async_trait::async_trait;

    /// Records every driver call and answers `read_text` from a canned body.
    struct ScriptedDriver {
        actions: Vec<String>,
        page_text: String,
    }

    impl ScriptedDriver {
        fn new(page_text: &str) -> Self {
            Self {
                actions: Vec::new(),
                page_text: page_text.to_string(),
            }
        }
    }

    #[async_trait]
    impl UiDriver for ScriptedDriver {
        async fn navigate(&mut self, url: &str) -> Result<()> {
            self.actions.push(format!("navigate {}", url));
            Ok(())
        }

        async fn fill_field(&mut self, name: &str, value: &str) -> Result<()> {
            self.actions.push(format!("fill {}={}", name, value));
            Ok(())
        }

        async fn click(&mut self, selector: &str) -> Result<()> {
            self.actions.push(format!("click {}", selector));
            Ok(())
        }

        async fn read_text(&mut self, selector: &str) -> Result<String> {
            self.actions.push(format!("read {}", selector));
            Ok(self.page_text.clone())
        }
    }

    fn pm_service() -> ServiceEndpoint {
        ServiceEndpoint {
            name: "product-management".to_string(),
            base_url: "https://reverse-proxy:8444".to_string(),
            login_path: "/login".to_string(),
            credentials: Some(Credentials {
                username: "manager".to_string(),
                password: "password".to_string(),
            }),
        }
    }

    #[tokio::test]
    async fn test_log_in_fills_credentials_and_submits() {
        let mut driver = ScriptedDriver::new("");
        log_in(&mut driver, &pm_service()).await.unwrap();

        assert_eq!(
            driver.actions,
            vec![
                "navigate https://reverse-proxy:8444/login",
                "fill username=manager",
                "fill password=password",
                "click button[type=submit]",
            ]
        );
    }

    #[tokio::test]
    async fn test_log_in_requires_credentials() {
        let mut service = pm_service();
        service.credentials = None;
        let mut driver = ScriptedDriver::new("");

        let err = log_in(&mut driver, &service).await.unwrap_err();
        assert!(matches!(err, ProbeError::MissingConfigError { .. }));
        assert!(driver.actions.is_empty());
    }

    #[tokio::test]
    async fn test_create_product_confirms_listing() {
        let mut driver = ScriptedDriver::new("<table>Sync Test Product</table>");
        let product = ProductSpec {
            name: "Sync Test Product".to_string(),
            kind: "SyncType".to_string(),
            price: "100.00".to_string(),
            unit: "pcs".to_string(),
            description: Some("Sync Description".to_string()),
        };

        create_product(&mut driver, "https://reverse-proxy:8444", &product)
            .await
            .unwrap();

        assert_eq!(driver.actions[0], "navigate https://reverse-proxy:8444/products");
        assert_eq!(driver.actions[1], "click text=Create New Product");
        assert!(driver.actions.contains(&"fill name=Sync Test Product".to_string()));
        assert!(driver.actions.contains(&"fill description=Sync Description".to_string()));
        assert_eq!(driver.actions.last().unwrap(), "read body");
    }

    #[tokio::test]
    async fn test_create_product_fails_when_not_listed() {
        let mut driver = ScriptedDriver::new("<table>something else</table>");
        let product = ProductSpec {
            name: "Missing Product".to_string(),
            kind: "T".to_string(),
            price: "1.00".to_string(),
            unit: "pcs".to_string(),
            description: None,
        };

        let err = create_product(&mut driver, "https://reverse-proxy:8444", &product)
            .await
            .unwrap_err();
        assert!(matches!(err, ProbeError::DriverError { .. }));
    }

    #[tokio::test]
    async fn test_delivery_flow_targets_sender_row() {
        let mut driver = ScriptedDriver::new("");
        create_delivery_with_stock(
            &mut driver,
            "https://reverse-proxy:8445",
            "Fulfill Supplier",
            "Fulfillment Test Product",
            "FT-1",
        )
        .await
        .unwrap();

        assert_eq!(
            driver.actions,
            vec![
                "navigate https://reverse-proxy:8445/deliveries",
                "fill sender=Fulfill Supplier",
                "click text=Create Delivery",
                "click row=Fulfill Supplier >> text=View",
                "fill productId=Fulfillment Test Product",
                "fill serialNumber=FT-1",
                "click text=Add Item",
            ]
        );
    }
}
