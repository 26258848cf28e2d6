//! End-to-end ledger scenarios against a real SQLite database.

use std::sync::Arc;

use rust_decimal_macros::dec;
use tempfile::TempDir;

use stockbook_core::errors::ValidationError;
use stockbook_core::history::HistoryService;
use stockbook_core::holdings::{HoldingRepositoryTrait, HoldingServiceTrait, HoldingsService};
use stockbook_core::portfolios::{
    NewPortfolio, Portfolio, PortfolioService, PortfolioServiceTrait,
};
use stockbook_core::transactions::{
    TransactionRepositoryTrait, TransactionService, TransactionServiceTrait,
};
use stockbook_core::Error;
use stockbook_storage_sqlite::holdings::HoldingRepository;
use stockbook_storage_sqlite::portfolios::PortfolioRepository;
use stockbook_storage_sqlite::transactions::TransactionRepository;
use stockbook_storage_sqlite::{create_pool, run_migrations, spawn_writer};

struct TestLedger {
    // Holds the database directory alive for the duration of the test.
    _dir: TempDir,
    transaction_repository: Arc<TransactionRepository>,
    holding_repository: Arc<HoldingRepository>,
    transaction_service: TransactionService,
    holdings_service: HoldingsService,
    history_service: HistoryService,
    portfolio: Portfolio,
}

async fn setup() -> TestLedger {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("stockbook.db");
    let pool = create_pool(db_path.to_str().unwrap()).unwrap();
    run_migrations(&pool).unwrap();
    let writer = spawn_writer(pool.as_ref().clone());

    let transaction_repository =
        Arc::new(TransactionRepository::new(pool.clone(), writer.clone()));
    let holding_repository = Arc::new(HoldingRepository::new(pool.clone(), writer.clone()));
    let portfolio_service =
        PortfolioService::new(Arc::new(PortfolioRepository::new(pool.clone(), writer)));

    let portfolio = portfolio_service
        .create_portfolio(NewPortfolio {
            id: None,
            name: "Main".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(
        portfolio_service.get_portfolio(&portfolio.id).unwrap(),
        portfolio
    );

    TestLedger {
        _dir: dir,
        transaction_service: TransactionService::new(
            transaction_repository.clone(),
            holding_repository.clone(),
        ),
        holdings_service: HoldingsService::new(
            holding_repository.clone(),
            transaction_repository.clone(),
        ),
        history_service: HistoryService::new(transaction_repository.clone()),
        transaction_repository,
        holding_repository,
        portfolio,
    }
}

#[tokio::test]
async fn test_buys_average_into_one_holding() {
    let ledger = setup().await;
    let pid = &ledger.portfolio.id;

    ledger
        .transaction_service
        .record_buy(pid, "AAPL", dec!(10), dec!(100))
        .await
        .unwrap();
    ledger
        .transaction_service
        .record_buy(pid, "aapl", dec!(10), dec!(200))
        .await
        .unwrap();

    let holding = ledger
        .holding_repository
        .get_holding(pid, "AAPL")
        .unwrap()
        .unwrap();
    assert_eq!(holding.shares, dec!(20));
    assert_eq!(holding.average_cost, dec!(150));
    assert_eq!(holding.book_value, dec!(3000));
}

#[tokio::test]
async fn test_sell_removes_cost_at_basis() {
    let ledger = setup().await;
    let pid = &ledger.portfolio.id;

    ledger
        .transaction_service
        .record_buy(pid, "AAPL", dec!(10), dec!(100))
        .await
        .unwrap();
    ledger
        .transaction_service
        .record_sell(pid, "AAPL", dec!(4), dec!(150))
        .await
        .unwrap();

    let holding = ledger
        .holding_repository
        .get_holding(pid, "AAPL")
        .unwrap()
        .unwrap();
    assert_eq!(holding.shares, dec!(6));
    assert_eq!(holding.book_value, dec!(600));
    assert_eq!(holding.average_cost, dec!(100));
}

#[tokio::test]
async fn test_oversell_is_rejected_with_no_mutation() {
    let ledger = setup().await;
    let pid = &ledger.portfolio.id;

    ledger
        .transaction_service
        .record_buy(pid, "AAPL", dec!(3), dec!(100))
        .await
        .unwrap();

    let err = ledger
        .transaction_service
        .record_sell(pid, "AAPL", dec!(5), dec!(100))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Validation(ValidationError::InsufficientShares { .. })
    ));

    // No transaction was created and the holding is unchanged.
    let transactions = ledger.transaction_repository.get_transactions(pid).unwrap();
    assert_eq!(transactions.len(), 1);
    let holding = ledger
        .holding_repository
        .get_holding(pid, "AAPL")
        .unwrap()
        .unwrap();
    assert_eq!(holding.shares, dec!(3));
}

#[tokio::test]
async fn test_selling_out_deletes_the_holding_row() {
    let ledger = setup().await;
    let pid = &ledger.portfolio.id;

    ledger
        .transaction_service
        .record_buy(pid, "AAPL", dec!(10), dec!(100))
        .await
        .unwrap();
    ledger
        .transaction_service
        .record_sell(pid, "AAPL", dec!(10), dec!(120))
        .await
        .unwrap();

    assert!(ledger
        .holding_repository
        .get_holding(pid, "AAPL")
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_deleting_history_unwinds_the_holding() {
    let ledger = setup().await;
    let pid = &ledger.portfolio.id;

    let first = ledger
        .transaction_service
        .record_buy(pid, "AAPL", dec!(10), dec!(100))
        .await
        .unwrap();
    let second = ledger
        .transaction_service
        .record_buy(pid, "AAPL", dec!(10), dec!(200))
        .await
        .unwrap();

    ledger
        .transaction_service
        .delete_transaction(&second.id)
        .await
        .unwrap();
    let holding = ledger
        .holding_repository
        .get_holding(pid, "AAPL")
        .unwrap()
        .unwrap();
    assert_eq!(holding.shares, dec!(10));
    assert_eq!(holding.average_cost, dec!(100));

    ledger
        .transaction_service
        .delete_transaction(&first.id)
        .await
        .unwrap();
    assert!(ledger
        .holding_repository
        .get_holding(pid, "AAPL")
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_csv_import_is_partial_success_with_historical_dates() {
    let ledger = setup().await;
    let pid = &ledger.portfolio.id;

    let csv = b"Symbol,Qty,Price,Type,Date\n\
        AAPL,10,100,buy,2024-01-02\n\
        ,5,50,buy,2024-01-03\n\
        MSFT,2,300,buy,2024-01-04";
    let result = ledger
        .transaction_service
        .import_transactions(pid, csv)
        .await
        .unwrap();

    assert_eq!(result.imported, 2);
    assert_eq!(result.errors.len(), 1);

    let transactions = ledger.transaction_repository.get_transactions(pid).unwrap();
    assert_eq!(transactions.len(), 2);
    assert_eq!(
        transactions[0].effective_date(),
        chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
    );

    let holdings = ledger.holding_repository.get_holdings(pid).unwrap();
    assert_eq!(holdings.len(), 2);
}

#[tokio::test]
async fn test_import_then_trade_replays_in_date_order() {
    let ledger = setup().await;
    let pid = &ledger.portfolio.id;

    // A live sell first, then a backdated buy imported afterwards: the
    // replay must order by date, so the sell folds after the buy.
    ledger
        .transaction_service
        .import_transactions(pid, b"Ticker,Shares,Price,Date\nAAPL,10,100,2020-06-01")
        .await
        .unwrap();
    ledger
        .transaction_service
        .record_sell(pid, "AAPL", dec!(4), dec!(180))
        .await
        .unwrap();

    let holding = ledger
        .holding_repository
        .get_holding(pid, "AAPL")
        .unwrap()
        .unwrap();
    assert_eq!(holding.shares, dec!(6));
    assert_eq!(holding.average_cost, dec!(100));
}

#[tokio::test]
async fn test_history_reflects_realized_profit() {
    let ledger = setup().await;
    let pid = &ledger.portfolio.id;

    ledger
        .transaction_service
        .import_transactions(
            pid,
            b"Ticker,Shares,Price,Type,Date\n\
              AAPL,10,10,buy,2024-01-01\n\
              AAPL,5,15,sell,2024-01-02",
        )
        .await
        .unwrap();

    let history = ledger.history_service.build_history(pid).unwrap();

    assert_eq!(history.len(), 2);
    assert_eq!(history[0].value, dec!(100));
    // Day 2: 5 remaining shares at the last traded price of 15.
    assert_eq!(history[1].value, dec!(75));
}

#[tokio::test]
async fn test_history_fills_quiet_days() {
    let ledger = setup().await;
    let pid = &ledger.portfolio.id;

    ledger
        .transaction_service
        .import_transactions(
            pid,
            b"Ticker,Shares,Price,Date\n\
              AAPL,10,10,2024-01-01\n\
              AAPL,1,20,2024-01-05",
        )
        .await
        .unwrap();

    let history = ledger.history_service.build_history(pid).unwrap();

    assert_eq!(history.len(), 5);
    assert_eq!(history[1].value, dec!(100));
    assert_eq!(history[2].value, dec!(100));
    assert_eq!(history[3].value, dec!(100));
    assert_eq!(history[4].value, dec!(220));
}

#[tokio::test]
async fn test_incremental_reverse_matches_replay_for_trailing_buy() {
    let ledger = setup().await;
    let pid = &ledger.portfolio.id;

    ledger
        .transaction_service
        .record_buy(pid, "AAPL", dec!(10), dec!(100))
        .await
        .unwrap();
    let last = ledger
        .transaction_service
        .record_buy(pid, "AAPL", dec!(10), dec!(200))
        .await
        .unwrap();

    let reversed = ledger
        .holdings_service
        .reverse(&last)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(reversed.shares, dec!(10));
    assert_eq!(reversed.book_value, dec!(1000));
    assert_eq!(reversed.average_cost, dec!(100));
}

#[tokio::test]
async fn test_recalculate_is_idempotent() {
    let ledger = setup().await;
    let pid = &ledger.portfolio.id;

    ledger
        .transaction_service
        .record_buy(pid, "AAPL", dec!(7), dec!(33.33))
        .await
        .unwrap();

    let first = ledger
        .holdings_service
        .recalculate(pid, "AAPL")
        .await
        .unwrap()
        .unwrap();
    let second = ledger
        .holdings_service
        .recalculate(pid, "AAPL")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(first.shares, second.shares);
    assert_eq!(first.average_cost, second.average_cost);
    assert_eq!(first.book_value, second.book_value);
}

#[tokio::test]
async fn test_reads_by_ticker_and_id() {
    let ledger = setup().await;
    let pid = &ledger.portfolio.id;

    let buy = ledger
        .transaction_service
        .record_buy(pid, "AAPL", dec!(10), dec!(100))
        .await
        .unwrap();
    ledger
        .transaction_service
        .record_buy(pid, "MSFT", dec!(2), dec!(300))
        .await
        .unwrap();

    let fetched = ledger
        .transaction_repository
        .get_transaction(&buy.id)
        .unwrap();
    assert_eq!(fetched.ticker, "AAPL");
    assert_eq!(fetched.seq, buy.seq);

    let aapl_only = ledger
        .transaction_repository
        .get_transactions_by_ticker(pid, "AAPL")
        .unwrap();
    assert_eq!(aapl_only.len(), 1);
    assert_eq!(aapl_only[0].id, buy.id);
}

#[tokio::test]
async fn test_holdings_listing_and_book_value_projection() {
    let ledger = setup().await;
    let pid = &ledger.portfolio.id;

    ledger
        .transaction_service
        .record_buy(pid, "MSFT", dec!(2), dec!(300))
        .await
        .unwrap();
    ledger
        .transaction_service
        .record_buy(pid, "AAPL", dec!(10), dec!(100))
        .await
        .unwrap();

    let holdings = ledger.holdings_service.get_holdings(pid).unwrap();
    assert_eq!(holdings.len(), 2);
    assert_eq!(holdings[0].ticker, "AAPL");

    let book_values = ledger.holdings_service.get_book_values(pid).unwrap();
    assert_eq!(book_values.len(), 2);
    assert_eq!(book_values[0].book_value, dec!(1000));
    assert_eq!(book_values[1].book_value, dec!(600));
}

#[tokio::test]
async fn test_recent_transactions_are_newest_first_and_bounded() {
    let ledger = setup().await;
    let pid = &ledger.portfolio.id;

    for i in 0..20 {
        ledger
            .transaction_service
            .record_buy(pid, "AAPL", dec!(1), rust_decimal::Decimal::from(100 + i))
            .await
            .unwrap();
    }

    let recent = ledger
        .transaction_service
        .get_recent_transactions(pid)
        .unwrap();

    assert_eq!(recent.len(), 15);
    assert!(recent[0].seq > recent[1].seq);
    assert_eq!(recent[0].price, rust_decimal::Decimal::from(119));
}
