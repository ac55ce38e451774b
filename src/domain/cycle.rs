//! Billing-cycle date boundaries and the pure status calculator.
//!
//! Nothing here touches storage or the wall clock; `now` is always passed in
//! so the derivation stays deterministic and testable. The persisted `status`
//! column is only ever a cache of [`calculate_status`].

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::domain::entities::card::{CardStatus, CreditCard};

/// Days past the due date during which an unpaid cycle stays `OVERDUE`
/// before it is treated as rolled into a fresh, not-yet-due cycle.
pub const GRACE_PERIOD_DAYS: i64 = 7;

/// Due days that do not exist in the target month clamp here. Documented
/// policy carried over from the ledger rules; February stays at 28 even in
/// leap years.
const DUE_DAY_CLAMP: u32 = 28;

/// "MM/YYYY" tag identifying the cycle a date falls in.
pub fn cycle_month_tag(date: NaiveDate) -> String {
    format!("{:02}/{}", date.month(), date.year())
}

fn month_after(year: i32, month: u32) -> (i32, u32) {
    if month == 12 { (year + 1, 1) } else { (year, month + 1) }
}

fn month_before(year: i32, month: u32) -> (i32, u32) {
    if month == 1 { (year - 1, 12) } else { (year, month - 1) }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = month_after(year, month);
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

/// Date with the day clamped into the month, so a statement day of 31 closes
/// on February's last day rather than failing.
fn clamped_date(year: i32, month: u32, day: u32) -> NaiveDate {
    let day = day.clamp(1, days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn due_date_in(year: i32, month: u32, due_day: u32) -> NaiveDate {
    let day = if due_day > days_in_month(year, month) {
        DUE_DAY_CLAMP
    } else {
        due_day.max(1)
    };
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)
}

/// Next occurrence of the statement day at the midnight floor: this month if
/// `now` has not reached it yet, otherwise next month.
pub fn next_statement(now: NaiveDateTime, statement_day: u32) -> NaiveDateTime {
    let today = now.date();
    let date = if today.day() < statement_day {
        clamped_date(today.year(), today.month(), statement_day)
    } else {
        let (year, month) = month_after(today.year(), today.month());
        clamped_date(year, month, statement_day)
    };
    date.and_time(NaiveTime::MIN)
}

/// End-of-day due instant of the currently open statement cycle: the cycle's
/// statement month is `now`'s month once the statement day has passed, else
/// the previous month, and the due day lands one calendar month after that.
pub fn payment_due(now: NaiveDateTime, statement_day: u32, due_day: u32) -> NaiveDateTime {
    let today = now.date();
    let (statement_year, statement_month) = if today.day() >= statement_day {
        (today.year(), today.month())
    } else {
        month_before(today.year(), today.month())
    };
    let (due_year, due_month) = month_after(statement_year, statement_month);
    due_date_in(due_year, due_month, due_day).and_time(end_of_day())
}

/// Derive the card's lifecycle state at `now`. Total over all day-of-month
/// values in 1–31; stored days outside that range are clamped here and
/// rejected upstream by the committer.
pub fn calculate_status(card: &CreditCard, now: NaiveDateTime) -> CardStatus {
    let statement_day = i64::from(card.statement_date).clamp(1, 31) as u32;
    let due_day = i64::from(card.payment_due_date).clamp(1, 31) as u32;

    let this_cycle = cycle_month_tag(now.date());
    let paid_this_cycle = card.current_cycle_month.as_deref() == Some(this_cycle.as_str())
        && card.last_payment_date.is_some();

    let statement_at = next_statement(now, statement_day);
    if now < statement_at {
        if paid_this_cycle {
            return CardStatus::PaidOff;
        }
        let due_at = payment_due(now, statement_day, due_day);
        let grace_end = due_at + Duration::days(GRACE_PERIOD_DAYS);
        if now > grace_end {
            // Aged out past the grace window: the next statement regenerates a
            // payable amount, so the unpaid cycle resets to not-due.
            CardStatus::NotDue
        } else if now > due_at {
            CardStatus::Overdue
        } else {
            CardStatus::NeedPayment
        }
    } else if paid_this_cycle {
        // Only reachable when the statement day was clamped to month end and a
        // payment was recorded the same day the new cycle opened.
        CardStatus::PaidOff
    } else {
        CardStatus::NeedPayment
    }
}
