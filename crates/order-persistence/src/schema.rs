// Esquema Diesel de la tabla `orders`.
// `data` guarda el documento JSON tal como llegó (texto UTF-8).
// `created_at` es el instante de la última escritura: `timestamptz` en
// Postgres, `TIMESTAMP` (texto) en SQLite.
#[cfg(all(feature = "pg", not(test)))]
diesel::table! {
    orders (order_uid) {
        order_uid -> Text,
        data -> Text,
        created_at -> Timestamptz,
    }
}

#[cfg(any(test, not(feature = "pg")))]
diesel::table! {
    orders (order_uid) {
        order_uid -> Text,
        data -> Text,
        created_at -> Timestamp,
    }
}
