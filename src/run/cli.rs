use anyhow::Result;
use chrono::Datelike;
use std::path::Path;

use super::args::{
    optional, parse_amount, parse_count, parse_date, parse_frequency, parse_id, parse_kind,
    parse_month, shellexpand, Args,
};
use crate::config::Config;
use crate::db::Database;
use crate::models::{Category, EntryKind, Transaction, TransactionFilter};
use crate::service::{self, Session};

const RECENT_COUNT: u32 = 10;
const TREND_MONTHS: u32 = 12;

pub(crate) fn as_cli(raw: &[String], db: &mut Database, config: &Config) -> Result<()> {
    let args = Args::parse(raw);
    let command = args.command().unwrap_or("help");

    match command {
        "signup" => return cli_signup(&args, db),
        "--help" | "-h" | "help" => {
            print_usage();
            return Ok(());
        }
        "--version" | "-V" | "version" => {
            println!("spendlog {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        _ => {}
    }

    let email = args.flag("--user").or(config.user.as_deref());
    let session = Session::authenticate(db, email)?;

    match command {
        "whoami" => cli_whoami(&args, db, &session),
        "users" => cli_users(db, &session),
        "categories" => cli_categories(&args, db, &session),
        "add-category" => cli_add_category(&args, db, &session),
        "edit-category" => cli_edit_category(&args, db, &session),
        "rm-category" => cli_rm_category(&args, db, &session),
        "add" => cli_add(&args, db, &session),
        "edit" => cli_edit(&args, db, &session),
        "list" | "ls" => cli_list(&args, db, &session),
        "recent" => cli_recent(&args, db, &session),
        "rm" => cli_rm(&args, db, &session),
        "recurring" => cli_recurring(&args, db, &session),
        "add-recurring" => cli_add_recurring(&args, db, &session),
        "edit-recurring" => cli_edit_recurring(&args, db, &session),
        "toggle" => cli_toggle(&args, db, &session),
        "rm-recurring" => cli_rm_recurring(&args, db, &session),
        "process" => cli_process(&args, db, &session),
        "summary" | "s" => cli_summary(&args, db, &session),
        "breakdown" => cli_breakdown(&args, db, &session),
        "category-stats" => cli_category_stats(&args, db, &session),
        "trends" => cli_trends(&args, db, &session),
        "dedupe" => cli_dedupe(&args, db, &session),
        "export" => cli_export(&args, db, &session),
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("spendlog - personal income and expense tracker");
    println!();
    println!("Usage: spendlog [--user <email>] <command>");
    println!();
    println!("Account:");
    println!("  signup <email> <name>             Create a user");
    println!("  whoami [--name N] [--email E]     Show or edit your profile");
    println!("  users                             List all users");
    println!();
    println!("Categories:");
    println!("  categories [income|expense]       List categories");
    println!("  add-category <name> <type>        Create a category");
    println!("    --color <#RRGGBB>");
    println!("  edit-category <id> [--name N] [--color C]");
    println!("  rm-category <id>                  Delete an unused category");
    println!();
    println!("Transactions:");
    println!("  add <type> <amount> <category> <description> [--date YYYY-MM-DD]");
    println!("  edit <id> [--amount A] [--description D] [--type T] [--date D] [--category C]");
    println!("  list                              Newest first");
    println!("    --limit N  --cursor ID  --type T  --category C  --search S  --from D  --to D");
    println!("  recent [N]                        Latest N transactions (default 10)");
    println!("  rm <id>                           Delete a transaction");
    println!();
    println!("Recurring:");
    println!("  recurring [--active|--paused]     List recurring definitions");
    println!("  add-recurring <type> <amount> <category> <frequency> <start> <description>");
    println!("    --end <YYYY-MM-DD>");
    println!("  edit-recurring <id> [--amount A] [--description D] [--frequency F]");
    println!("    [--start D] [--end D] [--category C] [--type T]");
    println!("  toggle <id>                       Pause or resume a definition");
    println!("  rm-recurring <id>                 Delete a definition");
    println!("  process [YYYY-MM-DD]              Create due recurring transactions");
    println!();
    println!("Reports:");
    println!("  summary [YYYY-MM]                 Monthly totals (default: current month)");
    println!("  breakdown [type] [--from D] [--to D]");
    println!("  category-stats <category> [--from D] [--to D]");
    println!("  trends [N]                        Last N months (default 12, max 24)");
    println!();
    println!("Maintenance:");
    println!("  dedupe [--dry-run]                Remove duplicate transactions");
    println!("  export [path] [--month YYYY-MM]   Export transactions to CSV");
    println!("  --help, -h                        Show this help");
    println!("  --version, -V                     Show version");
    println!();
    println!("The acting user comes from --user or SPENDLOG_USER.");
}

// ── Account ──────────────────────────────────────────────────

fn cli_signup(args: &Args, db: &Database) -> Result<()> {
    let usage = "signup <email> <name>";
    let email = args.required(0, usage)?;
    let name = args.rest(1).ok_or_else(|| anyhow::anyhow!("Usage: spendlog {usage}"))?;
    let user = service::register_user(db, email, &name)?;
    println!("Created user {} <{}>", user.name, user.email);
    Ok(())
}

fn cli_whoami(args: &Args, db: &Database, session: &Session) -> Result<()> {
    let patch = service::ProfilePatch {
        name: args.flag("--name").map(String::from),
        email: args.flag("--email").map(String::from),
    };
    let user = if patch.name.is_some() || patch.email.is_some() {
        service::update_profile(db, session, patch)?
    } else {
        service::profile(db, session)?
    };
    println!("{} <{}>", user.name, user.email);
    println!("Member since {}", user.created_at.get(..10).unwrap_or(&user.created_at));
    Ok(())
}

fn cli_users(db: &Database, session: &Session) -> Result<()> {
    let users = service::list_users(db, session)?;
    println!("{:<4} {:<30} Name", "ID", "Email");
    println!("{}", "─".repeat(55));
    for user in &users {
        println!("{:<4} {:<30} {}", user.id.unwrap_or(0), user.email, user.name);
    }
    Ok(())
}

// ── Categories ───────────────────────────────────────────────

fn cli_categories(args: &Args, db: &Database, session: &Session) -> Result<()> {
    let kind = optional(args.pos(0), parse_kind)?;
    let categories = service::list_categories(db, session, kind)?;
    if categories.is_empty() {
        println!("No categories");
        return Ok(());
    }

    println!("{:<4} {:<24} {:<8} {:<8} Scope", "ID", "Name", "Type", "Color");
    println!("{}", "─".repeat(55));
    for cat in &categories {
        println!(
            "{:<4} {:<24} {:<8} {:<8} {}",
            cat.id.unwrap_or(0),
            cat,
            cat.kind,
            cat.color,
            if cat.is_default { "default" } else { "own" },
        );
    }
    Ok(())
}

fn cli_add_category(args: &Args, db: &Database, session: &Session) -> Result<()> {
    let usage = "add-category <name> <income|expense> [--color #RRGGBB]";
    let name = args.required(0, usage)?;
    let kind = parse_kind(args.required(1, usage)?)?;
    let cat = service::create_category(db, session, name, kind, args.flag("--color"))?;
    println!("Created {} category {} (id {})", cat.kind, cat.name, cat.id.unwrap_or(0));
    Ok(())
}

fn cli_edit_category(args: &Args, db: &Database, session: &Session) -> Result<()> {
    let id = parse_id(args.required(0, "edit-category <id> [--name N] [--color C]")?)?;
    let patch = service::CategoryPatch {
        name: args.flag("--name").map(String::from),
        color: args.flag("--color").map(String::from),
    };
    let cat = service::update_category(db, session, id, patch)?;
    println!("Updated category {} ({})", cat.name, cat.color);
    Ok(())
}

fn cli_rm_category(args: &Args, db: &Database, session: &Session) -> Result<()> {
    let id = parse_id(args.required(0, "rm-category <id>")?)?;
    service::delete_category(db, session, id)?;
    println!("Deleted category {id}");
    Ok(())
}

/// Accept a category id or a name of the given kind.
fn resolve_category(db: &Database, session: &Session, arg: &str, kind: EntryKind) -> Result<i64> {
    if let Ok(id) = arg.parse::<i64>() {
        return Ok(id);
    }
    let categories = service::list_categories(db, session, Some(kind))?;
    Category::find_by_name(&categories, arg, kind)
        .and_then(|c| c.id)
        .ok_or_else(|| anyhow::anyhow!("No {kind} category named '{arg}'"))
}

/// Like [`resolve_category`], for flags where the kind may be unknown.
fn resolve_any_category(db: &Database, session: &Session, arg: &str) -> Result<i64> {
    if let Ok(id) = arg.parse::<i64>() {
        return Ok(id);
    }
    let categories = service::list_categories(db, session, None)?;
    let mut matches = EntryKind::all()
        .iter()
        .filter_map(|kind| Category::find_by_name(&categories, arg, *kind));
    match (matches.next(), matches.next()) {
        (Some(cat), None) => cat.id.ok_or_else(|| anyhow::anyhow!("Category has no ID")),
        (Some(_), Some(_)) => anyhow::bail!("'{arg}' is ambiguous; use the category id"),
        (None, _) => anyhow::bail!("No category named '{arg}'"),
    }
}

// ── Transactions ─────────────────────────────────────────────

fn cli_add(args: &Args, db: &Database, session: &Session) -> Result<()> {
    let usage = "add <income|expense> <amount> <category> <description> [--date YYYY-MM-DD]";
    let kind = parse_kind(args.required(0, usage)?)?;
    let amount = parse_amount(args.required(1, usage)?)?;
    let category_id = resolve_category(db, session, args.required(2, usage)?, kind)?;
    let description = args.rest(3).ok_or_else(|| anyhow::anyhow!("Usage: spendlog {usage}"))?;
    let date = optional(args.flag("--date"), parse_date)?
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let txn = service::create_transaction(
        db,
        session,
        service::NewTransaction {
            amount,
            description,
            kind,
            date,
            category_id,
        },
    )?;
    println!("Added {} ${:.2} on {} (id {})", txn.kind, txn.amount, txn.date, txn.id.unwrap_or(0));
    Ok(())
}

fn cli_edit(args: &Args, db: &Database, session: &Session) -> Result<()> {
    let id = parse_id(args.required(0, "edit <id> [--amount A] [--description D] ...")?)?;
    let patch = service::TransactionPatch {
        amount: optional(args.flag("--amount"), parse_amount)?,
        description: args.flag("--description").map(String::from),
        kind: optional(args.flag("--type"), parse_kind)?,
        date: optional(args.flag("--date"), parse_date)?,
        category_id: optional(args.flag("--category"), |c| resolve_any_category(db, session, c))?,
    };
    let txn = service::update_transaction(db, session, id, patch)?;
    println!("Updated transaction {id}: {} ${:.2} {}", txn.kind, txn.amount, txn.description);
    Ok(())
}

fn cli_list(args: &Args, db: &Database, session: &Session) -> Result<()> {
    let filter = TransactionFilter {
        kind: optional(args.flag("--type"), parse_kind)?,
        category_id: optional(args.flag("--category"), |c| resolve_any_category(db, session, c))?,
        start: optional(args.flag("--from"), parse_date)?,
        end: optional(args.flag("--to"), parse_date)?,
        search: args.flag("--search").map(String::from),
    };
    let limit = optional(args.flag("--limit"), parse_count)?.unwrap_or(service::DEFAULT_PAGE_SIZE);
    let cursor = optional(args.flag("--cursor"), parse_id)?;

    let page = service::list_transactions(db, session, &filter, limit, cursor)?;
    print_transactions(db, session, &page.transactions)?;
    if let Some(hint) = next_page_hint(&page) {
        println!();
        println!("{hint}");
    }
    Ok(())
}

fn next_page_hint(page: &service::TransactionPage) -> Option<String> {
    page.next_cursor.map(|next| format!("More results: --cursor {next}"))
}

fn cli_recent(args: &Args, db: &Database, session: &Session) -> Result<()> {
    let limit = optional(args.pos(0), parse_count)?.unwrap_or(RECENT_COUNT);
    let txns = service::recent_transactions(db, session, limit)?;
    print_transactions(db, session, &txns)
}

fn cli_rm(args: &Args, db: &Database, session: &Session) -> Result<()> {
    let id = parse_id(args.required(0, "rm <id>")?)?;
    service::delete_transaction(db, session, id)?;
    println!("Deleted transaction {id}");
    Ok(())
}

fn print_transactions(db: &Database, session: &Session, txns: &[Transaction]) -> Result<()> {
    if txns.is_empty() {
        println!("No transactions");
        return Ok(());
    }
    let categories = service::list_categories(db, session, None)?;

    println!("{:<6} {:<10} {:<20} {:>12}  Description", "ID", "Date", "Category", "Amount");
    println!("{}", "─".repeat(70));
    for txn in txns {
        let category = Category::find_by_id(&categories, txn.category_id)
            .map(|c| c.name.as_str())
            .unwrap_or("?");
        println!(
            "{:<6} {:<10} {:<20} {:>12}  {}",
            txn.id.unwrap_or(0),
            txn.date,
            category,
            format!("{:.2}", txn.signed_amount()),
            txn.description,
        );
    }
    Ok(())
}

// ── Recurring ────────────────────────────────────────────────

fn cli_recurring(args: &Args, db: &Database, session: &Session) -> Result<()> {
    let active = if args.has("--active") {
        Some(true)
    } else if args.has("--paused") {
        Some(false)
    } else {
        None
    };
    let list = service::list_recurring(db, session, active)?;
    if list.is_empty() {
        println!("No recurring transactions");
        return Ok(());
    }

    let today = chrono::Local::now().date_naive();
    println!(
        "{:<4} {:<8} {:>10}  {:<8} {:<10} {:<6}  Description",
        "ID", "Type", "Amount", "Every", "Next", "Active"
    );
    println!("{}", "─".repeat(70));
    for rec in &list {
        let state = match (rec.is_active, rec.is_due(today)) {
            (_, true) => "due",
            (true, false) => "yes",
            (false, _) => "no",
        };
        println!(
            "{:<4} {:<8} {:>10}  {:<8} {:<10} {:<6}  {}",
            rec.id.unwrap_or(0),
            rec.kind,
            format!("{:.2}", rec.amount),
            rec.frequency,
            rec.next_occurrence.to_string(),
            state,
            rec.description,
        );
    }
    Ok(())
}

fn cli_add_recurring(args: &Args, db: &Database, session: &Session) -> Result<()> {
    let usage = "add-recurring <type> <amount> <category> <frequency> <start> <description> [--end D]";
    let kind = parse_kind(args.required(0, usage)?)?;
    let amount = parse_amount(args.required(1, usage)?)?;
    let category_id = resolve_category(db, session, args.required(2, usage)?, kind)?;
    let frequency = parse_frequency(args.required(3, usage)?)?;
    let start_date = parse_date(args.required(4, usage)?)?;
    let description = args.rest(5).ok_or_else(|| anyhow::anyhow!("Usage: spendlog {usage}"))?;
    let end_date = optional(args.flag("--end"), parse_date)?;

    let rec = service::create_recurring(
        db,
        session,
        service::NewRecurring {
            amount,
            description,
            kind,
            frequency,
            start_date,
            end_date,
            category_id,
        },
    )?;
    println!(
        "Created {} recurring {} ${:.2}, next on {} (id {})",
        rec.frequency,
        rec.kind,
        rec.amount,
        rec.next_occurrence,
        rec.id.unwrap_or(0)
    );
    Ok(())
}

fn cli_edit_recurring(args: &Args, db: &Database, session: &Session) -> Result<()> {
    let id = parse_id(args.required(0, "edit-recurring <id> [--amount A] ...")?)?;
    let patch = service::RecurringPatch {
        amount: optional(args.flag("--amount"), parse_amount)?,
        description: args.flag("--description").map(String::from),
        kind: optional(args.flag("--type"), parse_kind)?,
        frequency: optional(args.flag("--frequency"), parse_frequency)?,
        start_date: optional(args.flag("--start"), parse_date)?,
        end_date: optional(args.flag("--end"), parse_date)?,
        category_id: optional(args.flag("--category"), |c| resolve_any_category(db, session, c))?,
        is_active: None,
    };
    let rec = service::update_recurring(db, session, id, patch)?;
    println!("Updated recurring {id}, next on {}", rec.next_occurrence);
    Ok(())
}

fn cli_toggle(args: &Args, db: &Database, session: &Session) -> Result<()> {
    let id = parse_id(args.required(0, "toggle <id>")?)?;
    let rec = service::toggle_active(db, session, id)?;
    println!(
        "Recurring {id} is now {}",
        if rec.is_active { "active" } else { "paused" }
    );
    Ok(())
}

fn cli_rm_recurring(args: &Args, db: &Database, session: &Session) -> Result<()> {
    let id = parse_id(args.required(0, "rm-recurring <id>")?)?;
    service::delete_recurring(db, session, id)?;
    println!("Deleted recurring {id}");
    Ok(())
}

fn cli_process(args: &Args, db: &mut Database, session: &Session) -> Result<()> {
    let as_of = optional(args.pos(0), parse_date)?;
    let outcome = service::process_recurring(db, session, as_of)?;
    for txn in &outcome.transactions {
        println!("  {} {} ${:.2} {}", txn.date, txn.kind, txn.amount, txn.description);
    }
    println!("{}", process_summary(&outcome));
    Ok(())
}

fn process_summary(outcome: &service::ProcessOutcome) -> String {
    format!(
        "Processed {} recurring transaction(s): {} created, {} skipped",
        outcome.processed,
        outcome.created(),
        outcome.skipped
    )
}

// ── Reports ──────────────────────────────────────────────────

fn cli_summary(args: &Args, db: &Database, session: &Session) -> Result<()> {
    let (year, month0) = match args.pos(0) {
        Some(m) => parse_month(m)?,
        None => {
            let today = chrono::Local::now().date_naive();
            (today.year(), today.month0())
        }
    };
    let stats = service::monthly_stats(db, session, year, month0)?;

    println!("spendlog - {year}-{:02}", month0 + 1);
    println!("{}", "─".repeat(40));
    println!("  Income:     ${:.2} ({})", stats.total_income, stats.income_count);
    println!("  Expenses:   ${:.2} ({})", stats.total_expenses, stats.expense_count);
    println!("  Net:        ${:.2}", stats.net_income);
    println!("  Total Txns: {}", stats.total_transactions);

    if let Some((start, end)) = crate::calendar::month_bounds(year, month0) {
        let spending =
            service::category_breakdown(db, session, Some(EntryKind::Expense), Some(start), Some(end))?;
        if !spending.is_empty() {
            println!();
            println!("Spending by Category:");
            for row in &spending {
                println!("  {:<24} ${:.2}", row.category, row.total_amount);
            }
        }
    }
    Ok(())
}

fn cli_breakdown(args: &Args, db: &Database, session: &Session) -> Result<()> {
    let kind = optional(args.pos(0), parse_kind)?;
    let start = optional(args.flag("--from"), parse_date)?;
    let end = optional(args.flag("--to"), parse_date)?;
    let rows = service::category_breakdown(db, session, kind, start, end)?;
    if rows.is_empty() {
        println!("No transactions");
        return Ok(());
    }

    println!("{:<24} {:<8} {:>12} {:>6}", "Category", "Type", "Total", "Count");
    println!("{}", "─".repeat(55));
    for row in &rows {
        println!(
            "{:<24} {:<8} {:>12} {:>6}",
            row.category,
            row.category.kind,
            format!("{:.2}", row.total_amount),
            row.transaction_count
        );
    }
    Ok(())
}

fn cli_category_stats(args: &Args, db: &Database, session: &Session) -> Result<()> {
    let arg = args.required(0, "category-stats <category> [--from D] [--to D]")?;
    let category_id = resolve_any_category(db, session, arg)?;
    let start = optional(args.flag("--from"), parse_date)?;
    let end = optional(args.flag("--to"), parse_date)?;
    let (total, count) = service::category_stats(db, session, category_id, start, end)?;
    println!("{arg}: ${total:.2} across {count} transaction(s)");
    Ok(())
}

fn cli_trends(args: &Args, db: &Database, session: &Session) -> Result<()> {
    let months = optional(args.pos(0), parse_count)?.unwrap_or(TREND_MONTHS);
    let today = chrono::Local::now().date_naive();
    let points = service::monthly_trends(db, session, months, today)?;

    println!("{:<9} {:>12} {:>12} {:>12}", "Month", "Income", "Expenses", "Net");
    println!("{}", "─".repeat(48));
    for p in &points {
        println!(
            "{:<9} {:>12} {:>12} {:>12}",
            format!("{} {}", p.month_name, p.year),
            format!("{:.2}", p.income),
            format!("{:.2}", p.expenses),
            format!("{:.2}", p.net),
        );
    }
    Ok(())
}

// ── Maintenance ──────────────────────────────────────────────

fn cli_dedupe(args: &Args, db: &mut Database, session: &Session) -> Result<()> {
    let dry_run = args.has("--dry-run");
    let outcome = service::cleanup_duplicates(db, session, dry_run)?;
    println!("{}", cleanup_summary(&outcome, dry_run));
    Ok(())
}

fn cleanup_summary(outcome: &service::CleanupOutcome, dry_run: bool) -> String {
    if outcome.duplicates == 0 {
        "No duplicate transactions".into()
    } else if dry_run {
        format!("Found {} duplicate transaction(s); nothing deleted", outcome.duplicates)
    } else {
        format!("Deleted {} duplicate transaction(s)", outcome.deleted)
    }
}

fn cli_export(args: &Args, db: &Database, session: &Session) -> Result<()> {
    let month = optional(args.flag("--month"), parse_month)?;
    let suffix = match month {
        Some((year, month0)) => format!("{year}-{:02}", month0 + 1),
        None => "all".into(),
    };

    // Output path is the first non-flag argument
    let output_path = args.pos(0).map(shellexpand).unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/spendlog-export-{suffix}.csv")
    });

    let count = crate::export::export_csv(db, session, Path::new(&output_path), month)?;
    if count == 0 {
        println!("No transactions to export ({suffix})");
    } else {
        println!("Exported {count} transactions to {output_path}");
    }
    Ok(())
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
