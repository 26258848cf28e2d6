#[cfg(test)]
mod tests {
    use crate::errors::ConsistencyError;
    use crate::holdings::holdings_model::HoldingSnapshot;
    use crate::holdings::ledger_calculator::{replay_holding, reverse_transaction};
    use crate::transactions::{Transaction, TransactionType};
    use crate::Error;
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn txn(seq: i64, transaction_type: TransactionType, shares: Decimal, price: Decimal) -> Transaction {
        Transaction {
            id: format!("txn-{}", seq),
            portfolio_id: "p1".to_string(),
            ticker: "AAPL".to_string(),
            transaction_type,
            shares,
            price,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
                + chrono::Duration::minutes(seq),
            seq,
        }
    }

    fn buy(seq: i64, shares: Decimal, price: Decimal) -> Transaction {
        txn(seq, TransactionType::Buy, shares, price)
    }

    fn sell(seq: i64, shares: Decimal, price: Decimal) -> Transaction {
        txn(seq, TransactionType::Sell, shares, price)
    }

    #[test]
    fn test_empty_history_yields_no_holding() {
        assert_eq!(replay_holding(&[]).unwrap(), None);
    }

    #[test]
    fn test_two_buys_average_cost() {
        let history = [buy(1, dec!(10), dec!(100)), buy(2, dec!(10), dec!(200))];
        let holding = replay_holding(&history).unwrap().unwrap();

        assert_eq!(holding.shares, dec!(20));
        assert_eq!(holding.book_value, dec!(3000));
        assert_eq!(holding.average_cost(), dec!(150));
    }

    #[test]
    fn test_sell_removes_cost_at_basis_not_sale_price() {
        let history = [buy(1, dec!(10), dec!(100)), sell(2, dec!(4), dec!(150))];
        let holding = replay_holding(&history).unwrap().unwrap();

        assert_eq!(holding.shares, dec!(6));
        assert_eq!(holding.book_value, dec!(600));
        assert_eq!(holding.average_cost(), dec!(100));
    }

    #[test]
    fn test_selling_everything_deletes_the_holding() {
        let history = [buy(1, dec!(10), dec!(100)), sell(2, dec!(10), dec!(180))];
        assert_eq!(replay_holding(&history).unwrap(), None);
    }

    #[test]
    fn test_fractional_shares_keep_book_value_coherent() {
        let history = [
            buy(1, dec!(3.5), dec!(33.33)),
            buy(2, dec!(1.25), dec!(41.10)),
            sell(3, dec!(2.75), dec!(40.00)),
        ];
        let holding = replay_holding(&history).unwrap().unwrap();

        let drift = (holding.book_value - holding.shares * holding.average_cost()).abs();
        assert!(drift < dec!(0.000001), "drift was {}", drift);
        assert_eq!(holding.shares, dec!(2.00));
    }

    #[test]
    fn test_oversell_in_log_is_consistency_error() {
        let history = [buy(1, dec!(3), dec!(100)), sell(2, dec!(5), dec!(100))];
        let err = replay_holding(&history).unwrap_err();

        assert!(matches!(
            err,
            Error::Consistency(ConsistencyError::Oversold { .. })
        ));
    }

    #[test]
    fn test_sell_against_empty_position_is_consistency_error() {
        let history = [sell(1, dec!(5), dec!(100))];
        let err = replay_holding(&history).unwrap_err();

        assert!(matches!(
            err,
            Error::Consistency(ConsistencyError::EmptyPositionSell { .. })
        ));
    }

    #[test]
    fn test_replay_is_idempotent() {
        let history = [
            buy(1, dec!(10), dec!(100)),
            sell(2, dec!(4), dec!(150)),
            buy(3, dec!(2), dec!(90)),
        ];
        assert_eq!(
            replay_holding(&history).unwrap(),
            replay_holding(&history).unwrap()
        );
    }

    #[test]
    fn test_reverse_buy_matches_replay_without_it() {
        let first = buy(1, dec!(10), dec!(100));
        let second = buy(2, dec!(10), dec!(200));

        let full = replay_holding(&[first.clone(), second.clone()]).unwrap();
        let reversed = reverse_transaction(full.as_ref(), &second);
        let expected = replay_holding(&[first]).unwrap();

        assert_eq!(reversed, expected);
    }

    #[test]
    fn test_reverse_last_buy_removes_holding() {
        let only = buy(1, dec!(10), dec!(100));
        let full = replay_holding(std::slice::from_ref(&only)).unwrap();

        assert_eq!(reverse_transaction(full.as_ref(), &only), None);
    }

    #[test]
    fn test_reverse_sell_restores_shares_and_book_value() {
        let holding = HoldingSnapshot {
            ticker: "AAPL".to_string(),
            shares: dec!(6),
            book_value: dec!(600),
        };
        let reversed = reverse_transaction(Some(&holding), &sell(2, dec!(4), dec!(100))).unwrap();

        assert_eq!(reversed.shares, dec!(10));
        assert_eq!(reversed.book_value, dec!(1000));
    }

    #[test]
    fn test_reverse_sell_with_no_holding_recreates_it_at_sale_price() {
        let reversed = reverse_transaction(None, &sell(1, dec!(10), dec!(180))).unwrap();

        assert_eq!(reversed.shares, dec!(10));
        assert_eq!(reversed.average_cost(), dec!(180));
    }

    #[test]
    fn test_reverse_buy_with_no_holding_is_noop() {
        assert_eq!(reverse_transaction(None, &buy(1, dec!(1), dec!(1))), None);
    }
}
