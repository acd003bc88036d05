// New records store every submitted value as-is; only the update field sets are typed.

use chrono::{DateTime, Local, TimeZone};
use mongodb::bson::{self, Bson, Document};
use serde::{Deserialize, Serialize};

use crate::repository::{FieldEquality, FieldSet, Resource, Unique};
use crate::store::Sort;

// A missing key field is matched as null, as MongoDB does for absent fields.
fn key(value: &Option<Bson>) -> Bson {
    value.clone().unwrap_or(Bson::Null)
}

fn set_if_present(set: &mut Document, field: &str, value: Option<impl Into<Bson>>) {
    if let Some(value) = value {
        set.insert(field, value);
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Bson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Bson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Bson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<Bson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Bson>,
    #[serde(flatten)]
    pub extra: Document,
}

impl Resource for Product {
    const COLLECTION: &'static str = "products";
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductPatch {
    pub title: Option<String>,
    pub price: Option<f64>,
    pub category: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
}

impl FieldSet<Product> for ProductPatch {
    fn into_set(self) -> Document {
        let mut set = Document::new();
        set_if_present(&mut set, "title", self.title);
        set_if_present(&mut set, "price", self.price);
        set_if_present(&mut set, "category", self.category);
        set_if_present(&mut set, "image", self.image);
        set_if_present(&mut set, "description", self.description);
        set
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<Bson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Bson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Bson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_price: Option<Bson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Bson>,
    #[serde(flatten)]
    pub extra: Document,
}

impl Resource for Order {
    const COLLECTION: &'static str = "orders";
}

/// Status transition; free text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderStatus {
    pub status: Option<String>,
}

impl FieldSet<Order> for OrderStatus {
    fn into_set(self) -> Document {
        let mut set = Document::new();
        set_if_present(&mut set, "status", self.status);
        set
    }
}

/// Customer-editable delivery details.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetails {
    pub address: Option<String>,
    pub quantity: Option<i64>,
    pub total_price: Option<f64>,
}

impl FieldSet<Order> for OrderDetails {
    fn into_set(self) -> Document {
        let mut set = Document::new();
        set_if_present(&mut set, "address", self.address);
        set_if_present(&mut set, "quantity", self.quantity);
        set_if_present(&mut set, "totalPrice", self.total_price);
        set
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct User {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Bson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Bson>,
    #[serde(flatten)]
    pub extra: Document,
}

impl Resource for User {
    const COLLECTION: &'static str = "users";
}

impl Unique for User {
    const DUPLICATE_MESSAGE: &'static str = "User already exists";

    fn uniqueness(&self) -> FieldEquality {
        FieldEquality::new().field("email", key(&self.email))
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoleChange {
    pub role: Option<String>,
}

impl FieldSet<User> for RoleChange {
    fn into_set(self) -> Document {
        let mut set = Document::new();
        set_if_present(&mut set, "role", self.role);
        set
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<Bson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<Bson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<Bson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<Bson>,
    #[serde(flatten)]
    pub extra: Document,
}

impl Resource for Review {
    const COLLECTION: &'static str = "reviews";
    const LIST_ORDER: Option<Sort> = Some(Sort::descending("_id"));
}

/// A review edit. The `date` field is always rewritten to today's date marked as edited.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReviewEdit {
    #[serde(rename = "newComment", alias = "comment")]
    pub comment: Option<String>,
    #[serde(rename = "newRating", alias = "rating")]
    pub rating: Option<f64>,
}

impl ReviewEdit {
    pub fn into_set_at<Tz: TimeZone>(self, now: DateTime<Tz>) -> Document
    where
        Tz::Offset: std::fmt::Display,
    {
        let mut set = Document::new();
        set_if_present(&mut set, "comment", self.comment);
        set_if_present(&mut set, "rating", self.rating);
        set.insert("date", edited_date(&now));
        set
    }
}

impl FieldSet<Review> for ReviewEdit {
    fn into_set(self) -> Document {
        self.into_set_at(Local::now())
    }
}

/// `M/D/YYYY (Edited)`, the storefront's display format for edited reviews.
pub fn edited_date<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{} (Edited)", now.format("%-m/%-d/%Y"))
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<Bson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<Bson>,
    #[serde(flatten)]
    pub extra: Document,
}

impl Resource for WishlistItem {
    const COLLECTION: &'static str = "wishlist";
}

impl Unique for WishlistItem {
    const DUPLICATE_MESSAGE: &'static str = "Already in your Wishlist";

    fn uniqueness(&self) -> FieldEquality {
        FieldEquality::new()
            .field("productId", key(&self.product_id))
            .field("userEmail", key(&self.user_email))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<Bson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<Bson>,
    #[serde(flatten)]
    pub extra: Document,
}

impl Resource for CompareItem {
    const COLLECTION: &'static str = "compare";
}

impl Unique for CompareItem {
    const DUPLICATE_MESSAGE: &'static str = "Already added";

    fn uniqueness(&self) -> FieldEquality {
        FieldEquality::new()
            .field("productId", key(&self.product_id))
            .field("userEmail", key(&self.user_email))
    }
}

/// A contact-form message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Message {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Bson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<Bson>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Bson>,
    #[serde(flatten)]
    pub extra: Document,
}

impl Resource for Message {
    const COLLECTION: &'static str = "messages";
    const LIST_ORDER: Option<Sort> = Some(Sort::descending("submittedAt"));

    fn prepare(doc: &mut Document) {
        if !doc.contains_key("submittedAt") {
            doc.insert("submittedAt", bson::DateTime::now());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use serde_json::json;

    #[test]
    fn product_keeps_unknown_fields_on_insert() {
        let product: Product =
            serde_json::from_value(json!({ "title": "Lamp", "price": 20, "stock": 3 })).unwrap();
        let doc = bson::to_document(&product).unwrap();

        assert_eq!(doc.get_str("title").unwrap(), "Lamp");
        assert_eq!(doc.get("price"), Some(&Bson::Int32(20)));
        assert!(doc.contains_key("stock"));
        assert!(!doc.contains_key("category"));
    }

    #[test]
    fn insert_records_store_values_of_any_type() {
        let product: Product =
            serde_json::from_value(json!({ "title": "Lamp", "price": "20" })).unwrap();
        let doc = bson::to_document(&product).unwrap();
        assert_eq!(doc.get_str("price").unwrap(), "20");

        let order: Order = serde_json::from_value(json!({ "quantity": 2.5 })).unwrap();
        let doc = bson::to_document(&order).unwrap();
        assert_eq!(doc.get_f64("quantity").unwrap(), 2.5);

        let item: WishlistItem =
            serde_json::from_value(json!({ "productId": 42, "userEmail": "a@b.c" })).unwrap();
        assert_eq!(
            item.uniqueness().into_document().get("productId"),
            Some(&Bson::Int32(42))
        );

        let message: Message =
            serde_json::from_value(json!({ "message": { "text": "hi" } })).unwrap();
        let doc = bson::to_document(&message).unwrap();
        assert_eq!(
            doc.get_document("message").unwrap().get_str("text").unwrap(),
            "hi"
        );
    }

    #[test]
    fn missing_uniqueness_key_matches_null() {
        let user: User = serde_json::from_value(json!({ "name": "Ada" })).unwrap();
        let filter = user.uniqueness().into_document();
        assert_eq!(filter.get("email"), Some(&Bson::Null));
        assert!(!bson::to_document(&user).unwrap().contains_key("email"));
    }

    #[test]
    fn product_patch_ignores_unknown_fields() {
        let patch: ProductPatch =
            serde_json::from_value(json!({ "title": "Desk lamp", "stock": 3, "_id": "x" }))
                .unwrap();
        let set = patch.into_set();
        assert_eq!(set.keys().collect::<Vec<_>>(), vec!["title"]);
    }

    #[test]
    fn order_field_sets_are_disjoint() {
        let body = json!({ "status": "shipped", "address": "1 Main St", "quantity": 2, "totalPrice": 40.0 });

        let status: OrderStatus = serde_json::from_value(body.clone()).unwrap();
        assert_eq!(status.into_set().keys().collect::<Vec<_>>(), vec!["status"]);

        let details: OrderDetails = serde_json::from_value(body).unwrap();
        assert_eq!(
            details.into_set().keys().collect::<Vec<_>>(),
            vec!["address", "quantity", "totalPrice"]
        );
    }

    #[test]
    fn review_edit_accepts_both_spellings() {
        let edit: ReviewEdit =
            serde_json::from_value(json!({ "comment": "fine", "rating": 3 })).unwrap();
        assert_eq!(edit.comment.as_deref(), Some("fine"));
        assert_eq!(edit.rating, Some(3.0));
    }

    #[test]
    fn edited_date_uses_unpadded_us_format() {
        let now = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2026, 3, 7, 12, 0, 0)
            .unwrap();
        assert_eq!(edited_date(&now), "3/7/2026 (Edited)");

        let edit = ReviewEdit {
            comment: Some("great".into()),
            rating: None,
        };
        let set = edit.into_set_at(Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0).unwrap());
        assert_eq!(set.get_str("date").unwrap(), "10/18/2026 (Edited)");
        assert!(!set.contains_key("rating"));
    }

    #[test]
    fn wishlist_uniqueness_covers_product_and_user() {
        let item: WishlistItem =
            serde_json::from_value(json!({ "productId": "p1", "userEmail": "a@b.c" })).unwrap();
        let filter = item.uniqueness().into_document();
        assert_eq!(filter.get_str("productId").unwrap(), "p1");
        assert_eq!(filter.get_str("userEmail").unwrap(), "a@b.c");
    }

    #[test]
    fn message_submitted_at_is_stamped_once() {
        let mut fresh = bson::doc! { "message": "hi" };
        Message::prepare(&mut fresh);
        assert!(fresh.get_datetime("submittedAt").is_ok());

        let mut stamped = bson::doc! { "submittedAt": "earlier" };
        Message::prepare(&mut stamped);
        assert_eq!(stamped.get_str("submittedAt").unwrap(), "earlier");
    }
}
