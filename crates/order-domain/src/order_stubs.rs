use bytes::Bytes;
use serde_json::json;

pub struct OrderStubs;

impl OrderStubs {
    /// Pedido completo de ejemplo con la clave indicada.
    pub fn sample_order(order_uid: &str) -> Bytes {
        let doc = json!({
            "order_uid": order_uid,
            "track_number": "WBILMTESTTRACK",
            "entry": "WBIL",
            "delivery": {
                "name": "Test Testov",
                "phone": "+9720000000",
                "zip": "2639809",
                "city": "Kiryat Mozkin",
                "address": "Ploshad Mira 15",
                "region": "Kraiot",
                "email": "test@gmail.com"
            },
            "payment": {
                "transaction": order_uid,
                "currency": "USD",
                "provider": "wbpay",
                "amount": 1817,
                "payment_dt": 1637907727,
                "bank": "alpha",
                "delivery_cost": 1500,
                "goods_total": 317,
                "custom_fee": 0
            },
            "items": [{
                "chrt_id": 9934930,
                "track_number": "WBILMTESTTRACK",
                "price": 453,
                "rid": "ab4219087a764ae0btest",
                "name": "Mascaras",
                "sale": 30,
                "size": "0",
                "total_price": 317,
                "nm_id": 2389212,
                "brand": "Vivienne Sabo",
                "status": 202
            }],
            "locale": "en",
            "customer_id": "test",
            "delivery_service": "meest",
            "date_created": "2021-11-26T06:22:19Z"
        });
        Bytes::from(doc.to_string())
    }
}
