use tracing::info;

use crate::error::{PipelineError, Result};
use crate::fetch::{HttpClient, fetch_bytes};

/// A customer record from the customers endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: i64,
    /// `None` for an empty `<name/>` element.
    pub name: Option<String>,
}

/// Decodes the customers XML document.
///
/// Every element child of the root is one customer; tag names are not
/// checked. Each must carry `<name>` and `<id>` children; an empty `<name/>`
/// gives a customer without a name.
///
/// ```xml
/// <customers>
///   <customer><name>Alice</name><id>1</id></customer>
/// </customers>
/// ```
pub fn parse_customers(bytes: &[u8]) -> Result<Vec<Customer>> {
    let text = std::str::from_utf8(bytes).map_err(|e| PipelineError::parse("customers", e))?;
    let doc = roxmltree::Document::parse(text).map_err(|e| PipelineError::parse("customers", e))?;

    doc.root_element()
        .children()
        .filter(|node| node.is_element())
        .map(|node| {
            let name = child_text(node, "name")?;
            let id = child_text(node, "id")?.unwrap_or_default();
            let id = id.trim().parse::<i64>().map_err(|e| {
                PipelineError::parse("customers", format!("invalid <id> {id:?}: {e}"))
            })?;

            Ok(Customer {
                id,
                name: name.map(str::to_string),
            })
        })
        .collect()
}

fn child_text<'a>(node: roxmltree::Node<'a, '_>, tag: &str) -> Result<Option<&'a str>> {
    let child = node
        .children()
        .find(|c| c.has_tag_name(tag))
        .ok_or_else(|| {
            PipelineError::parse(
                "customers",
                format!("missing <{tag}> in <{}>", node.tag_name().name()),
            )
        })?;

    Ok(child.text().filter(|t| !t.is_empty()))
}

#[tracing::instrument(skip(client))]
pub async fn fetch_customers<C: HttpClient + ?Sized>(
    client: &C,
    url: &str,
) -> Result<Vec<Customer>> {
    let bytes = fetch_bytes(client, url).await?;
    let customers = parse_customers(&bytes)?;
    info!(count = customers.len(), "Customers fetched");
    Ok(customers)
}
