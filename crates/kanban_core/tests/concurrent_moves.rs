use kanban_core::db::open_db;
use kanban_core::{
    CardFields, CardRepository, ColumnService, OrderingEngine, SqliteCardRepository,
    SqliteColumnRepository,
};
use std::thread;
use uuid::Uuid;

const WORKERS: usize = 4;
const CARDS_PER_WORKER: usize = 6;

#[test]
fn concurrent_moves_from_separate_connections_keep_columns_dense() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("board.sqlite3");
    let owner = Uuid::new_v4();

    let setup_conn = open_db(&path).unwrap();
    let columns = ColumnService::new(SqliteColumnRepository::try_new(&setup_conn).unwrap());
    let source = columns.create_column(owner, "Backlog").unwrap().id;
    let targets = [
        columns.create_column(owner, "Doing").unwrap().id,
        columns.create_column(owner, "Done").unwrap().id,
    ];

    let engine = OrderingEngine::new(
        SqliteColumnRepository::try_new(&setup_conn).unwrap(),
        SqliteCardRepository::try_new(&setup_conn).unwrap(),
    );
    let card_ids: Vec<Uuid> = (0..WORKERS * CARDS_PER_WORKER)
        .map(|index| {
            engine
                .append(source, CardFields::new(format!("Card {index}")), owner)
                .unwrap()
                .id
        })
        .collect();

    let worker_conns: Vec<_> = (0..WORKERS).map(|_| open_db(&path).unwrap()).collect();
    let handles: Vec<_> = worker_conns
        .into_iter()
        .zip(card_ids.chunks(CARDS_PER_WORKER).map(<[Uuid]>::to_vec))
        .enumerate()
        .map(|(worker, (conn, batch))| {
            thread::spawn(move || {
                let engine = OrderingEngine::new(
                    SqliteColumnRepository::try_new(&conn).unwrap(),
                    SqliteCardRepository::try_new(&conn).unwrap(),
                );
                for (step, card_id) in batch.into_iter().enumerate() {
                    let destination = targets[(worker + step) % targets.len()];
                    engine
                        .move_card(card_id, destination, (step % 2) as i64, owner)
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let cards = SqliteCardRepository::try_new(&setup_conn).unwrap();
    assert_eq!(cards.count_cards(source).unwrap(), 0);
    let mut total = 0;
    for column in targets {
        let orders: Vec<i64> = cards
            .list_cards(column)
            .unwrap()
            .iter()
            .map(|card| card.order)
            .collect();
        let expected: Vec<i64> = (0..orders.len() as i64).collect();
        assert_eq!(orders, expected);
        total += orders.len();
    }
    assert_eq!(total, WORKERS * CARDS_PER_WORKER);
}
