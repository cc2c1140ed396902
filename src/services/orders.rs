use thiserror::Error;

use crate::domain::auth::AuthenticatedUser;
use crate::domain::order::{Order, OrderStatusChange};
use crate::domain::types::{CustomerId, OrderId, OrderStatus};
use crate::forms::orders::OrderStatusFormPayload;
use crate::pagination::{DEFAULT_ITEMS_PER_PAGE, Paginated};
use crate::repository::{OrderListQuery, OrderReader, OrderWriter};
use crate::specs::FieldErrors;

use super::{ServiceError, ServiceResult, ensure_admin};

const ORDER_EXPORT_HEADERS: [&str; 14] = [
    "order_number",
    "created_at",
    "email",
    "customer_id",
    "order_status",
    "payment_status",
    "items",
    "subtotal",
    "tax",
    "shipping",
    "discount",
    "total",
    "ship_to",
    "city",
];

pub struct DownloadFile {
    pub file_name: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("failed to render csv")]
    CsvRender,
}

fn customer_id(user: &AuthenticatedUser) -> ServiceResult<CustomerId> {
    CustomerId::new(user.sub.as_str()).map_err(|_| ServiceError::Unauthorized)
}

fn list<R>(query: OrderListQuery, page: usize, repo: &R) -> ServiceResult<Paginated<Order>>
where
    R: OrderReader,
{
    match repo.list_orders(query.paginate(page, DEFAULT_ITEMS_PER_PAGE)) {
        Ok((total, orders)) => Ok(Paginated::new(orders, page, total, DEFAULT_ITEMS_PER_PAGE)),
        Err(e) => {
            log::error!("Failed to list orders: {e}");
            Err(ServiceError::Internal)
        }
    }
}

fn find_order<R>(order_id: OrderId, repo: &R) -> ServiceResult<Order>
where
    R: OrderReader,
{
    match repo.get_order_by_id(order_id) {
        Ok(Some(order)) => Ok(order),
        Ok(None) => Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get order: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// The signed-in customer's orders, newest first.
pub fn show_my_orders<R>(
    page: usize,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Paginated<Order>>
where
    R: OrderReader,
{
    let customer_id = customer_id(user)?;
    list(OrderListQuery::default().customer(customer_id), page.max(1), repo)
}

/// Orders of other customers are reported as missing.
pub fn show_my_order<R>(order_id: OrderId, user: &AuthenticatedUser, repo: &R) -> ServiceResult<Order>
where
    R: OrderReader,
{
    let customer_id = customer_id(user)?;
    let order = find_order(order_id, repo)?;
    if order.customer_id.as_ref() != Some(&customer_id) {
        return Err(ServiceError::NotFound);
    }
    Ok(order)
}

pub fn show_orders<R>(
    status: Option<String>,
    page: usize,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Paginated<Order>>
where
    R: OrderReader,
{
    ensure_admin(user)?;

    let mut query = OrderListQuery::default();
    if let Some(status) = status.filter(|s| !s.trim().is_empty()) {
        match OrderStatus::try_from(status.as_str()) {
            Ok(status) => query = query.status(status),
            Err(e) => {
                let mut errors = FieldErrors::new();
                errors.add("status", e.to_string());
                return Err(errors.into());
            }
        }
    }
    list(query, page.max(1), repo)
}

pub fn show_order<R>(order_id: OrderId, user: &AuthenticatedUser, repo: &R) -> ServiceResult<Order>
where
    R: OrderReader,
{
    ensure_admin(user)?;
    find_order(order_id, repo)
}

/// Move an order or its payment to the next status.
pub fn change_order_status<R>(
    order_id: OrderId,
    payload: OrderStatusFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Order>
where
    R: OrderReader + OrderWriter,
{
    ensure_admin(user)?;

    let order = find_order(order_id, repo)?;
    let (allowed, from, to) = match payload.change {
        OrderStatusChange::Fulfilment(next) => (
            order.order_status.can_transition_to(next),
            order.order_status.as_str(),
            next.as_str(),
        ),
        OrderStatusChange::Payment(next) => (
            order.payment_status.can_transition_to(next),
            order.payment_status.as_str(),
            next.as_str(),
        ),
    };
    if !allowed {
        return Err(ServiceError::Form(format!(
            "Cannot change status from {from} to {to}."
        )));
    }

    if let Err(e) = repo.apply_status_change(order_id, payload.change) {
        log::error!("Failed to update order status: {e}");
        return Err(ServiceError::Internal);
    }
    log::info!("Order {} status changed: {:?}", order.order_number, payload.change);

    find_order(order_id, repo)
}

/// Every order as a CSV download, newest first.
pub fn export_orders<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<DownloadFile>
where
    R: OrderReader,
{
    ensure_admin(user)?;

    let orders = match repo.list_orders(OrderListQuery::default()) {
        Ok((_total, orders)) => orders,
        Err(e) => {
            log::error!("Failed to list orders: {e}");
            return Err(ServiceError::Internal);
        }
    };

    let rows: Vec<Vec<String>> = orders.iter().map(order_row).collect();
    render_csv("orders", &ORDER_EXPORT_HEADERS, &rows).map_err(|e| {
        log::error!("Failed to export orders: {e}");
        ServiceError::Internal
    })
}

fn order_row(order: &Order) -> Vec<String> {
    let items = order
        .items
        .iter()
        .map(|item| format!("{} x{}", item.sku, item.quantity))
        .collect::<Vec<_>>()
        .join("; ");

    vec![
        order.order_number.to_string(),
        order.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        order.email.to_string(),
        order
            .customer_id
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default(),
        order.order_status.to_string(),
        order.payment_status.to_string(),
        items,
        format!("{:.2}", order.subtotal),
        format!("{:.2}", order.tax),
        format!("{:.2}", order.shipping),
        format!("{:.2}", order.discount),
        format!("{:.2}", order.total),
        order.shipping_address.full_name.clone(),
        order.shipping_address.city.clone(),
    ]
}

pub fn render_csv(
    base_name: &str,
    headers: &[&str],
    rows: &[Vec<String>],
) -> Result<DownloadFile, DownloadError> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer
        .write_record(headers)
        .map_err(|_| DownloadError::CsvRender)?;
    for row in rows {
        let escaped_row: Vec<String> = row.iter().map(|value| escape_csv_cell(value)).collect();
        writer
            .write_record(&escaped_row)
            .map_err(|_| DownloadError::CsvRender)?;
    }
    let bytes = writer.into_inner().map_err(|_| DownloadError::CsvRender)?;
    Ok(DownloadFile {
        file_name: format!("{base_name}.csv"),
        content_type: "text/csv; charset=utf-8",
        bytes,
    })
}

/// Spreadsheets run cells starting with these characters as formulas.
fn escape_csv_cell(value: &str) -> String {
    match value.chars().next() {
        Some('=' | '+' | '-' | '@') => format!("'{value}"),
        _ => value.to_string(),
    }
}
