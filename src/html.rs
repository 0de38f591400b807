//! Pure view functions from entities to markup.
//!
//! Nothing in here touches the element tree, so every function can be tested
//! by parsing its output.

use maud::{Markup, html};
use time::{
    Month, PrimitiveDateTime, format_description::BorrowedFormatItem, macros::format_description,
};

use crate::{Account, Transaction, TransactionType};

/// The currency symbol shown after every amount.
pub const CURRENCY: &str = "₽";

/// The transactions page title when no account is selected.
pub const ACCOUNT_TITLE_PLACEHOLDER: &str = "Название счёта";

const CREATED_AT_FORMATS: [&[BorrowedFormatItem<'static>]; 3] = [
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]"),
];

/// Format an amount the way it is shown next to the currency symbol, e.g.
/// `500` or `4.5`.
pub fn format_sum(sum: f64) -> String {
    sum.to_string()
}

/// Reformat a server timestamp such as "2019-03-10 03:20:41" into the long
/// Russian form "10 марта 2019 г. в 03:20".
///
/// Timestamps that cannot be parsed are returned unchanged.
pub fn format_date(created_at: &str) -> String {
    let parsed = CREATED_AT_FORMATS
        .iter()
        .find_map(|format| PrimitiveDateTime::parse(created_at, *format).ok());

    match parsed {
        Some(date_time) => format!(
            "{} {} {} г. в {:02}:{:02}",
            date_time.day(),
            genitive_month(date_time.month()),
            date_time.year(),
            date_time.hour(),
            date_time.minute()
        ),
        None => {
            tracing::warn!("could not parse transaction date {created_at:?}");
            created_at.to_owned()
        }
    }
}

fn genitive_month(month: Month) -> &'static str {
    match month {
        Month::January => "января",
        Month::February => "февраля",
        Month::March => "марта",
        Month::April => "апреля",
        Month::May => "мая",
        Month::June => "июня",
        Month::July => "июля",
        Month::August => "августа",
        Month::September => "сентября",
        Month::October => "октября",
        Month::November => "ноября",
        Month::December => "декабря",
    }
}

/// An account entry for the sidebar list.
pub fn account_item(account: &Account) -> Markup {
    html! {
        li class="account" data-id=(account.id)
        {
            a href="#"
            {
                span { (account.name) }
                " / "
                span { (format_sum(account.sum)) " " (CURRENCY) }
            }
        }
    }
}

/// The `<option>` elements for choosing an account, in the given order.
pub fn account_options(accounts: &[Account]) -> Markup {
    html! {
        @for account in accounts {
            option value=(account.id) { (account.name) }
        }
    }
}

/// One income or expense row on the transactions page.
pub fn transaction_row(transaction: &Transaction) -> Markup {
    let kind_class = match transaction.kind {
        TransactionType::Income => "transaction_income",
        TransactionType::Expense => "transaction_expense",
    };

    html! {
        div class=(format!("transaction {kind_class} row"))
        {
            div class="col-md-7 transaction__details"
            {
                div class="transaction__icon"
                {
                    span class="fa fa-money fa-2x" {}
                }

                div class="transaction__info"
                {
                    h4 class="transaction__title" { (transaction.name) }
                    div class="transaction__date" { (format_date(&transaction.created_at)) }
                }
            }

            div class="col-md-3"
            {
                div class="transaction__summ"
                {
                    (format_sum(transaction.sum)) " "
                    span class="currency" { (CURRENCY) }
                }
            }

            div class="col-md-2 transaction__controls"
            {
                button class="btn btn-danger transaction__remove" data-id=(transaction.id)
                {
                    i class="fa fa-trash" {}
                }
            }
        }
    }
}

/// Every transaction row, in the given order.
pub fn transaction_rows(transactions: &[Transaction]) -> Markup {
    html! {
        @for transaction in transactions {
            (transaction_row(transaction))
        }
    }
}
