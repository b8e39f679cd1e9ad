//! 인메모리 SQLite에 대한 CRUD 흐름

#![cfg(feature = "sqlite")]

mod common;

use serde::{Deserialize, Serialize};
use serde_json::json;

use common::{init_tracing, User};
use gp_sql::record::Row;
use gp_sql::{dao, Conditions, Executor, Options, Page, Query, Record, SqliteExecutor};

const SCHEMA: &str = "
    CREATE TABLE users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_name TEXT NOT NULL,
        age INTEGER NOT NULL,
        email TEXT
    );
";

fn setup() -> Options {
    init_tracing();
    let exec = SqliteExecutor::open_in_memory().unwrap();
    exec.execute_batch(SCHEMA).unwrap();
    let opts = Options::new().db(exec.into_handle());

    let users = vec![
        User::new("alice", 31),
        User::new("bob", 17),
        User::new("carol", 45),
        User::new("dave", 31),
        User::new("erin", 22),
    ];
    assert_eq!(dao::insert_batch_size(&users, 2, &opts).unwrap(), 5);
    opts
}

#[derive(Debug, PartialEq, Record, Serialize, Deserialize)]
struct Flag {
    #[record(primary_key)]
    id: i64,
    vip: bool,
}

#[derive(Debug, Deserialize)]
struct AgeBucket {
    age: i64,
    n: i64,
}

#[test]
fn test_select_by_id_and_ids() {
    let opts = setup();

    let bob: User = dao::select_by_id(2, &opts).unwrap();
    assert_eq!(bob.user_name, "bob");
    assert_eq!(bob.email, None);

    let users: Vec<User> = dao::select_by_ids([1, 3, 42], &opts).unwrap();
    let names: Vec<&str> = users.iter().map(|u| u.user_name.as_str()).collect();
    assert_eq!(names, vec!["alice", "carol"]);

    assert!(dao::select_by_id::<User>(42, &opts).unwrap_err().is_not_found());
}

#[test]
fn test_conditions_and_brackets() {
    let opts = setup();

    let query = Query::<User>::new()
        .ge("age", 30)
        .or_bracket(|g| g.like_right("user_name", "e"))
        .order_by_asc(["id"]);
    let users = dao::select_list(&query, &opts).unwrap();
    let names: Vec<&str> = users.iter().map(|u| u.user_name.as_str()).collect();
    assert_eq!(names, vec!["alice", "carol", "dave", "erin"]);

    let count = dao::select_count(&Query::<User>::new().between("age", 18, 40), &opts).unwrap();
    assert_eq!(count, 3);

    let none = Query::<User>::new().in_("id", Vec::<i64>::new());
    assert!(dao::select_list(&none, &opts).unwrap().is_empty());
}

#[test]
fn test_condition_map_after_or() {
    let opts = setup();

    let query = Query::<User>::new()
        .eq("age", 31)
        .or()
        .eq("age", 17)
        .condition_eq_one("user_name", "bob");
    let users = dao::select_list(&query, &opts).unwrap();
    let names: Vec<&str> = users.iter().map(|u| u.user_name.as_str()).collect();
    assert_eq!(names, vec!["bob"]);

    let query = Query::<User>::new()
        .eq("age", 45)
        .or_bracket(|g| g.eq("age", 31))
        .condition_eq_one("user_name", "dave");
    assert_eq!(dao::select_count(&query, &opts).unwrap(), 1);
}

#[test]
fn test_narrowed_select_decodes_record() {
    let opts = setup();

    let query = Query::<User>::new().lt("age", 25).order_by_asc(["id"]);
    let users = dao::select_list(&query, &opts.clone().select(["user_name"])).unwrap();
    assert_eq!(
        users,
        vec![
            User { id: 0, user_name: "bob".into(), age: 0, email: None },
            User { id: 0, user_name: "erin".into(), age: 0, email: None },
        ]
    );

    let carol: User = dao::select_one(
        &Query::new().eq("user_name", "carol").select(["id", "age"]),
        &opts,
    )
    .unwrap();
    assert_eq!((carol.id, carol.age, carol.user_name.as_str()), (3, 45, ""));
}

#[test]
fn test_bool_round_trip() {
    init_tracing();
    let exec = SqliteExecutor::open_in_memory().unwrap();
    exec.execute_batch(
        "CREATE TABLE flag (id INTEGER PRIMARY KEY AUTOINCREMENT, vip INTEGER NOT NULL);",
    )
    .unwrap();
    let opts = Options::new().db(exec.into_handle());

    dao::insert(&Flag { id: 0, vip: true }, &opts).unwrap();
    dao::insert(&Flag { id: 0, vip: false }, &opts).unwrap();

    let first: Flag = dao::select_by_id(1, &opts).unwrap();
    assert_eq!(first, Flag { id: 1, vip: true });
    let second: Flag = dao::select_by_id(2, &opts).unwrap();
    assert!(!second.vip);

    let vips = dao::select_list(&Query::<Flag>::new().eq("vip", true), &opts).unwrap();
    assert_eq!(vips, vec![Flag { id: 1, vip: true }]);
}

#[test]
fn test_column_proxy() {
    let opts = setup();

    let (query, cols) = Query::<User>::with_columns();
    let query = query.eq(cols.user_name, "dave");
    let dave = dao::select_one(&query, &opts).unwrap();
    assert_eq!(dave.age, 31);
}

#[test]
fn test_pagination() {
    let opts = setup();

    let mut page = Page::new(2, 2);
    let query = Query::<User>::new().order_by_desc(["age"]);
    dao::select_page(&mut page, &query, &opts).unwrap();

    assert_eq!(page.total, 5);
    assert_eq!(page.pages(), 3);
    let ages: Vec<i64> = page.records.iter().map(|u| u.age).collect();
    assert_eq!(ages, vec![31, 22]);

    let mut maps: Page<Row> = Page::new(3, 2);
    dao::select_page_maps(&mut maps, &query.clone().select(["user_name"]), &opts).unwrap();
    assert_eq!(maps.records.len(), 1);
    assert_eq!(maps.records[0].get("user_name"), Some(&json!("bob")));
    assert!(maps.records[0].get("age").is_none());
}

#[test]
fn test_group_having_projection() {
    let opts = setup();

    let query = Query::<User>::new()
        .select(["age", "COUNT(*) AS n"])
        .group(["age"])
        .having("COUNT(*) > ?", [1]);
    let buckets: Vec<AgeBucket> = dao::select_list_model(&query, &opts).unwrap();
    assert_eq!(buckets.len(), 1);
    assert_eq!((buckets[0].age, buckets[0].n), (31, 2));

    assert_eq!(dao::select_count(&Query::<User>::new().group(["age"]), &opts).unwrap(), 4);

    let mut page: Page<AgeBucket> = Page::new(1, 10);
    dao::select_page_model(&mut page, &query, &opts).unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.records[0].n, 2);

    let rows = dao::select_list_maps(&Query::<User>::new().distinct(["age"]), &opts).unwrap();
    assert_eq!(rows.len(), 4);
}

#[test]
fn test_update_and_delete() {
    let opts = setup();

    let mut bob: User = dao::select_by_id(2, &opts).unwrap();
    bob.age = 18;
    bob.email = Some("bob@example.com".into());
    assert_eq!(dao::update_by_id(&bob, &opts).unwrap(), 1);
    assert_eq!(dao::select_by_id::<User>(2, &opts).unwrap(), bob);

    let query = Query::<User>::new().eq("age", 31).set("email", "team@example.com");
    assert_eq!(dao::update(&query, &opts).unwrap(), 2);
    let team = dao::select_list_by_map::<User>([("email", "team@example.com")], &opts).unwrap();
    assert_eq!(team.len(), 2);

    assert_eq!(dao::delete_by_id::<User>(1, &opts).unwrap(), 1);
    assert_eq!(dao::delete_by_ids::<User>([2, 3], &opts).unwrap(), 2);
    assert_eq!(dao::delete_by_map::<User>([("user_name", "erin")], &opts).unwrap(), 1);
    assert_eq!(dao::delete(&Query::<User>::new().is_not_null("id"), &opts).unwrap(), 1);
    assert!(!dao::exists(&Query::<User>::new(), &opts).unwrap());
}

#[test]
fn test_omit_on_insert_and_read() {
    let opts = setup();

    let mut eve = User::new("eve", 28);
    eve.email = Some("eve@example.com".into());
    dao::insert(&eve, &opts.clone().omit(["email"])).unwrap();

    let stored: User = dao::select_one(&Query::new().eq("user_name", "eve"), &opts).unwrap();
    assert_eq!(stored.id, 6);
    assert_eq!(stored.email, None);

    let rows = dao::select_list_maps(&Query::<User>::new().eq("id", 6), &opts.clone().omit(["age"]))
        .unwrap();
    assert!(rows[0].get("age").is_none());
    assert!(rows[0].contains_key("user_name"));
}

#[test]
fn test_transaction_scope() {
    let opts = setup();

    let tx = dao::begin(&opts).unwrap();
    let tx_opts = Options::new().db(tx.clone());
    dao::delete_by_id::<User>(1, &tx_opts).unwrap();
    assert!(!dao::exists(&Query::<User>::new().eq("id", 1), &tx_opts).unwrap());
    tx.rollback().unwrap();

    assert!(dao::exists(&Query::<User>::new().eq("id", 1), &opts).unwrap());
}
