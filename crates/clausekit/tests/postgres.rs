//! Terminal calls against a live Postgres; skipped when DATABASE_URL is unset.

#![allow(dead_code)]

use clausekit::{Db, Direction, Entity, FromRow, OrmResult};
use tokio_postgres::NoTls;

#[derive(Debug, Entity, FromRow, PartialEq)]
struct Lesson {
    #[orm(json = "id")]
    id: i64,
    #[orm(json = "title")]
    title: String,
    #[orm(json = "sort")]
    sort: i64,
}

#[derive(Debug, Entity, FromRow)]
struct LessonView {
    #[orm(json = "id")]
    lesson_id: i64,
    #[serde(rename = "title")]
    heading: String,
}

async fn connect(test: &str) -> OrmResult<Option<tokio_postgres::Client>> {
    dotenvy::dotenv().ok();
    let database_url = match std::env::var("DATABASE_URL") {
        Ok(v) => v,
        Err(_) => {
            eprintln!("DATABASE_URL is not set; skipping {test}");
            return Ok(None);
        }
    };
    let (client, connection) = tokio_postgres::connect(&database_url, NoTls).await?;
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            eprintln!("connection error: {e}");
        }
    });
    Ok(Some(client))
}

async fn seed(client: &tokio_postgres::Client, table: &str) -> OrmResult<()> {
    client
        .batch_execute(&format!(
            "CREATE TEMP TABLE {table} (id BIGINT PRIMARY KEY, title TEXT NOT NULL, sort BIGINT NOT NULL);
             INSERT INTO {table} (id, title, sort)
             SELECT n, 'lesson ' || n, n % 4 FROM generate_series(1, 120) AS n;"
        ))
        .await?;
    Ok(())
}

#[tokio::test]
async fn count_and_pages_share_a_base_query() -> OrmResult<()> {
    let Some(client) = connect("count_and_pages_share_a_base_query").await? else {
        return Ok(());
    };
    let table = format!("clausekit_pages_{}", std::process::id());
    seed(&client, &table).await?;

    let base = Db::new(&table).gt("sort", 0i64);
    let total = base.session().scan_count(&client).await?;
    assert_eq!(total, 90);

    let page: Vec<Lesson> = base
        .session()
        .select_by_struct::<Lesson>()
        .order_by_struct::<Lesson>("id", Direction::Asc)
        .page_limit(2, 1000)
        .scan_all(&client)
        .await?;
    assert_eq!(page.len(), 50);
    assert!(page.windows(2).all(|w| w[0].id < w[1].id));

    // the base handle is unaffected by the paging above
    assert_eq!(base.scan_count(&client).await?, total);
    Ok(())
}

#[tokio::test]
async fn scan_one_and_rejected_order() -> OrmResult<()> {
    let Some(client) = connect("scan_one_and_rejected_order").await? else {
        return Ok(());
    };
    let table = format!("clausekit_one_{}", std::process::id());
    seed(&client, &table).await?;

    let first: Option<Lesson> = Db::new(&table)
        .order_by_struct::<Lesson>("id DESC; DROP TABLE lessons", Direction::Asc)
        .order_by_struct::<Lesson>("id", Direction::Desc)
        .scan_one(&client)
        .await?;
    assert_eq!(first.map(|l| l.id), Some(120));

    let none: Option<Lesson> = Db::new(&table).eq("id", -1i64).scan_one(&client).await?;
    assert!(none.is_none());
    Ok(())
}

#[tokio::test]
async fn delete_by_nil_ignores_destination() -> OrmResult<()> {
    let Some(client) = connect("delete_by_nil_ignores_destination").await? else {
        return Ok(());
    };
    let table = format!("clausekit_delete_{}", std::process::id());
    seed(&client, &table).await?;

    let db = Db::new(&table).model("id", 1i64).eq("sort", 1i64);
    // id = 1 AND sort = 1
    assert_eq!(db.delete(&client).await?, 1);
    // sort = 1 only
    assert_eq!(db.delete_by_nil(&client).await?, 29);
    // no predicate at all matches nothing
    assert_eq!(Db::new(&table).delete_by_nil(&client).await?, 0);
    assert_eq!(Db::new(&table).scan_count(&client).await?, 90);
    Ok(())
}

#[tokio::test]
async fn projection_decodes_into_its_entity() -> OrmResult<()> {
    let Some(client) = connect("projection_decodes_into_its_entity").await? else {
        return Ok(());
    };
    let table = format!("clausekit_view_{}", std::process::id());
    seed(&client, &table).await?;

    let view: Option<LessonView> = Db::new(&table)
        .select_by_struct::<LessonView>()
        .order_by_struct::<LessonView>("id", Direction::Desc)
        .scan_one(&client)
        .await?;
    let view = view.expect("seeded rows");
    assert_eq!(view.lesson_id, 120);
    assert_eq!(view.heading, "lesson 120");
    Ok(())
}
