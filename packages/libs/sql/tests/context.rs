//! 전역 기본 핸들 수명주기
//!
//! 전역 상태를 다루므로 이 파일은 테스트 하나로 순서를 고정합니다.

mod common;

use serde_json::json;

use common::{handle, init_tracing, Call, RecordingExecutor, User};
use gp_sql::{config, dao, Config, Conditions, Options, Query};

#[test]
fn test_init_lifecycle() {
    init_tracing();

    // 초기화 전
    assert!(!gp_sql::is_initialized());
    let err = dao::select_count(&Query::<User>::new(), &Options::new()).unwrap_err();
    assert_eq!(err.code(), "NOT_INITIALIZED");

    // 빈 배치는 핸들 없이도 no-op
    assert_eq!(dao::insert_batch::<User>(&[], &Options::new()).unwrap(), 0);

    let first = RecordingExecutor::new();
    let config = Config {
        batch_size: 2,
        ..Config::default()
    };
    gp_sql::init_with(handle(&first), config).unwrap();
    assert!(gp_sql::is_initialized());
    assert_eq!(config::current().batch_size, 2);

    // 두 번째 init은 에러, 기존 핸들 유지
    let second = RecordingExecutor::new();
    let err = gp_sql::init(handle(&second)).unwrap_err();
    assert_eq!(err.code(), "ALREADY_INITIALIZED");

    dao::delete(&Query::<User>::new().eq("age", 3), &Options::new()).unwrap();
    assert_eq!(first.calls().len(), 1);
    assert!(second.calls().is_empty());

    // 설정된 배치 크기 사용
    let users: Vec<User> = (0..5).map(|i| User::new("u", i)).collect();
    dao::insert_batch(&users, &Options::new()).unwrap();
    let inserts = first
        .calls()
        .iter()
        .filter(|call| matches!(call, Call::Insert(_)))
        .count();
    assert_eq!(inserts, 3);

    // 지정 핸들이 전역 핸들보다 우선
    let local = RecordingExecutor::new();
    dao::delete_by_id::<User>(json!(1), &Options::new().db(handle(&local))).unwrap();
    assert_eq!(local.calls().len(), 1);
    assert_eq!(first.calls().len(), 4);
}
