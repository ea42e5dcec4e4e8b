diesel::table! {
    items (code) {
        code -> Text,
        description -> Text,
        category -> Text,
    }
}

diesel::table! {
    stock_details (id) {
        id -> Text,
        item_code -> Text,
        variant -> Text,
        unit_price -> BigInt,
        quantity -> Integer,
    }
}

diesel::table! {
    customers (id) {
        id -> Text,
        name -> Text,
        phone -> Nullable<Text>,
        email -> Nullable<Text>,
        registered_at -> Timestamp,
    }
}

diesel::table! {
    loyalty_cards (card_number) {
        card_number -> Text,
        customer_id -> Text,
        discount_bps -> Integer,
        points -> BigInt,
        issued_at -> Timestamp,
        active -> Bool,
    }
}

diesel::table! {
    users (username) {
        username -> Text,
        password_hash -> Text,
        role -> Text,
        active -> Bool,
        created_at -> Timestamp,
    }
}

diesel::table! {
    orders (id) {
        id -> Text,
        issued_at -> Timestamp,
        subtotal -> BigInt,
        discount -> BigInt,
        total -> BigInt,
        customer_id -> Nullable<Text>,
        operator -> Text,
        loyalty_card -> Nullable<Text>,
    }
}

diesel::table! {
    order_lines (order_id, line_no) {
        order_id -> Text,
        line_no -> Integer,
        stock_id -> Text,
        quantity -> Integer,
        unit_price -> BigInt,
        discount -> BigInt,
        amount -> BigInt,
    }
}

diesel::table! {
    returns (id) {
        id -> Text,
        order_id -> Text,
        line_no -> Integer,
        quantity -> Integer,
        refund -> BigInt,
        reason -> Text,
        operator -> Text,
        returned_at -> Timestamp,
    }
}

diesel::table! {
    purchase_orders (id) {
        id -> Text,
        supplier -> Text,
        status -> Text,
        created_at -> Timestamp,
        received_at -> Nullable<Timestamp>,
        total_cost -> BigInt,
    }
}

diesel::table! {
    purchase_order_lines (purchase_order_id, line_no) {
        purchase_order_id -> Text,
        line_no -> Integer,
        stock_id -> Text,
        quantity -> Integer,
        unit_cost -> BigInt,
    }
}

diesel::joinable!(stock_details -> items (item_code));
diesel::joinable!(loyalty_cards -> customers (customer_id));
diesel::joinable!(order_lines -> orders (order_id));
diesel::joinable!(order_lines -> stock_details (stock_id));
diesel::joinable!(purchase_order_lines -> purchase_orders (purchase_order_id));

diesel::allow_tables_to_appear_in_same_query!(
    items,
    stock_details,
    customers,
    loyalty_cards,
    users,
    orders,
    order_lines,
    returns,
    purchase_orders,
    purchase_order_lines,
);

/// DDL applied on every open; each statement is idempotent.
pub(crate) const CREATE_TABLES: &str = r"
CREATE TABLE IF NOT EXISTS items (
    code        TEXT PRIMARY KEY NOT NULL,
    description TEXT NOT NULL,
    category    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS stock_details (
    id         TEXT PRIMARY KEY NOT NULL,
    item_code  TEXT NOT NULL REFERENCES items (code),
    variant    TEXT NOT NULL,
    unit_price BIGINT NOT NULL CHECK (unit_price >= 0),
    quantity   INTEGER NOT NULL CHECK (quantity >= 0)
);
CREATE INDEX IF NOT EXISTS stock_details_item_code ON stock_details (item_code);

CREATE TABLE IF NOT EXISTS customers (
    id            TEXT PRIMARY KEY NOT NULL,
    name          TEXT NOT NULL,
    phone         TEXT,
    email         TEXT,
    registered_at TIMESTAMP NOT NULL
);

CREATE TABLE IF NOT EXISTS loyalty_cards (
    card_number  TEXT PRIMARY KEY NOT NULL,
    customer_id  TEXT NOT NULL REFERENCES customers (id),
    discount_bps INTEGER NOT NULL CHECK (discount_bps BETWEEN 0 AND 10000),
    points       BIGINT NOT NULL DEFAULT 0,
    issued_at    TIMESTAMP NOT NULL,
    active       BOOLEAN NOT NULL DEFAULT 1
);
CREATE UNIQUE INDEX IF NOT EXISTS loyalty_cards_one_active
    ON loyalty_cards (customer_id) WHERE active = 1;

CREATE TABLE IF NOT EXISTS users (
    username      TEXT PRIMARY KEY NOT NULL,
    password_hash TEXT NOT NULL,
    role          TEXT NOT NULL,
    active        BOOLEAN NOT NULL DEFAULT 1,
    created_at    TIMESTAMP NOT NULL
);

CREATE TABLE IF NOT EXISTS orders (
    id           TEXT PRIMARY KEY NOT NULL,
    issued_at    TIMESTAMP NOT NULL,
    subtotal     BIGINT NOT NULL,
    discount     BIGINT NOT NULL,
    total        BIGINT NOT NULL CHECK (total >= 0),
    customer_id  TEXT REFERENCES customers (id),
    operator     TEXT NOT NULL REFERENCES users (username),
    loyalty_card TEXT REFERENCES loyalty_cards (card_number)
);
CREATE INDEX IF NOT EXISTS orders_customer_id ON orders (customer_id);

CREATE TABLE IF NOT EXISTS order_lines (
    order_id   TEXT NOT NULL REFERENCES orders (id),
    line_no    INTEGER NOT NULL,
    stock_id   TEXT NOT NULL REFERENCES stock_details (id),
    quantity   INTEGER NOT NULL CHECK (quantity > 0),
    unit_price BIGINT NOT NULL,
    discount   BIGINT NOT NULL,
    amount     BIGINT NOT NULL,
    PRIMARY KEY (order_id, line_no)
);

CREATE TABLE IF NOT EXISTS returns (
    id          TEXT PRIMARY KEY NOT NULL,
    order_id    TEXT NOT NULL,
    line_no     INTEGER NOT NULL,
    quantity    INTEGER NOT NULL CHECK (quantity > 0),
    refund      BIGINT NOT NULL,
    reason      TEXT NOT NULL,
    operator    TEXT NOT NULL REFERENCES users (username),
    returned_at TIMESTAMP NOT NULL,
    FOREIGN KEY (order_id, line_no) REFERENCES order_lines (order_id, line_no)
);
CREATE INDEX IF NOT EXISTS returns_order_line ON returns (order_id, line_no);

CREATE TABLE IF NOT EXISTS purchase_orders (
    id          TEXT PRIMARY KEY NOT NULL,
    supplier    TEXT NOT NULL,
    status      TEXT NOT NULL,
    created_at  TIMESTAMP NOT NULL,
    received_at TIMESTAMP,
    total_cost  BIGINT NOT NULL
);

CREATE TABLE IF NOT EXISTS purchase_order_lines (
    purchase_order_id TEXT NOT NULL REFERENCES purchase_orders (id),
    line_no           INTEGER NOT NULL,
    stock_id          TEXT NOT NULL REFERENCES stock_details (id),
    quantity          INTEGER NOT NULL CHECK (quantity > 0),
    unit_cost         BIGINT NOT NULL,
    PRIMARY KEY (purchase_order_id, line_no)
);
";
