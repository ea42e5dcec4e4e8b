mod printer;
mod rows;
mod table;

pub(crate) use printer::{OutputFormat, Printer};
pub(crate) use rows::{
    CardRow, CustomerRow, ItemRow, OrderRow, PurchaseOrderRow, ReceiptRow, ReturnRow, StockRow,
    UserRow,
};
