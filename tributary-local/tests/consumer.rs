mod util;
use util::*;

static INIT: std::sync::Once = std::sync::Once::new();

// cargo test --test consumer -- --nocapture
#[cfg_attr(feature = "runtime-tokio", tokio::test)]
#[cfg_attr(feature = "runtime-async-std", async_std::test)]
async fn future_start_time() -> anyhow::Result<()> {
    use tributary_local::LocalConsumer;
    use tributary_types::{StreamErr, Timestamp};

    INIT.call_once(env_logger::init);

    let dir = tempfile::tempdir()?;
    let mut options = options(dir.path(), "c1");
    options.set_start_time(Timestamp::now_utc() + time::Duration::seconds(1));
    assert!(matches!(
        LocalConsumer::open(options).await,
        Err(StreamErr::InvalidArgument(_))
    ));

    // now is fine
    let mut options = util::options(dir.path(), "c1");
    options.set_start_time(Timestamp::now_utc());
    assert!(LocalConsumer::open(options).await.is_ok());

    Ok(())
}

#[cfg_attr(feature = "runtime-tokio", tokio::test)]
#[cfg_attr(feature = "runtime-async-std", async_std::test)]
async fn mark_and_reset() -> anyhow::Result<()> {
    use tributary_local::{CheckpointStore, LocalConsumer};
    use tributary_types::{Buffer, ConsumerStats};

    INIT.call_once(env_logger::init);

    let dir = tempfile::tempdir()?;
    let root = dir.path().join("stream");
    let cp_dir = dir.path().join("checkpoints");
    let base = base_time();

    write_file(&root, "c1", base + minutes(1), 0, "a\nb\nc\n")?;
    write_file(&root, "c1", base + minutes(2), 0, "d\n")?;

    let mut options = options(&root, "c1");
    options.set_checkpoint_dir(&cp_dir);

    let consumer = LocalConsumer::open(options.clone()).await?;
    assert!(consumer.mark_supported());
    // nothing read yet
    consumer.mark().await?;
    let store = CheckpointStore::new(&cp_dir, "test", partition("c1"));
    assert_eq!(store.load().await?.unwrap().file, None);

    assert_eq!(consumer.next().await?.unwrap().as_str()?, "a");
    assert_eq!(consumer.next().await?.unwrap().as_str()?, "b");
    consumer.mark().await?;
    consumer.close().await;
    assert_eq!(
        consumer.metrics(),
        ConsumerStats {
            messages_consumed: 2,
            mark_calls: 2,
            reset_calls: 0,
        }
    );

    let checkpoint = store.load().await?.unwrap();
    assert_eq!(checkpoint.file, Some(file_name("c1", base + minutes(1), 0)));
    assert_eq!(checkpoint.record_offset, 2);

    // a restart resumes right after the last record marked
    let consumer = LocalConsumer::open(options).await?;
    let record = consumer.next().await?.unwrap();
    assert_eq!(record.as_str()?, "c");
    assert_eq!(*record.header().offset(), 2);
    assert_eq!(consumer.next().await?.unwrap().as_str()?, "d");

    // and so does a reset
    consumer.reset().await?;
    assert_eq!(consumer.next().await?.unwrap().as_str()?, "c");
    assert_eq!(consumer.metrics().reset_calls, 1);

    Ok(())
}

#[cfg_attr(feature = "runtime-tokio", tokio::test)]
#[cfg_attr(feature = "runtime-async-std", async_std::test)]
async fn mark_unsupported() -> anyhow::Result<()> {
    use tributary_local::LocalConsumer;
    use tributary_types::Buffer;

    INIT.call_once(env_logger::init);

    let dir = tempfile::tempdir()?;
    let base = base_time();
    write_file(dir.path(), "c1", base + minutes(1), 0, "a\nb\n")?;

    let consumer = LocalConsumer::open(options(dir.path(), "c1")).await?;
    assert!(!consumer.mark_supported());
    assert_eq!(consumer.next().await?.unwrap().as_str()?, "a");
    consumer.mark().await?;
    consumer.reset().await?;
    // reset did nothing
    assert_eq!(consumer.next().await?.unwrap().as_str()?, "b");
    assert_eq!(consumer.metrics().mark_calls, 0);
    assert_eq!(consumer.metrics().reset_calls, 0);

    Ok(())
}

#[cfg_attr(feature = "runtime-tokio", tokio::test)]
#[cfg_attr(feature = "runtime-async-std", async_std::test)]
async fn close() -> anyhow::Result<()> {
    use std::time::Duration;
    use tributary_local::LocalConsumer;
    use tributary_runtime::{sleep, timeout};
    use tributary_types::{export::futures::join, Buffer, Pull};

    INIT.call_once(env_logger::init);

    let dir = tempfile::tempdir()?;
    let base = base_time();
    write_file(dir.path(), "c1", base + minutes(1), 0, "a\n")?;

    let mut options = options(dir.path(), "c1");
    options.set_wait_time_for_file_create(Duration::from_secs(60));
    let consumer = LocalConsumer::open(options).await?;
    assert_eq!(consumer.next().await?.unwrap().as_str()?, "a");

    // next() is waiting for a file that never comes, until the consumer is closed
    let (res, _) = timeout(
        Duration::from_secs(10),
        async {
            join!(consumer.next(), async {
                sleep(Duration::from_millis(100)).await;
                consumer.close().await;
            })
        },
    )
    .await?;
    assert!(res?.is_none());
    assert!(consumer.is_closed());

    assert!(consumer.next().await?.is_none());
    assert!(matches!(consumer.try_next().await?, Pull::Closed));

    Ok(())
}

#[cfg_attr(feature = "runtime-tokio", tokio::test)]
#[cfg_attr(feature = "runtime-async-std", async_std::test)]
async fn stream() -> anyhow::Result<()> {
    use tributary_local::LocalConsumer;
    use tributary_types::{
        export::futures::{StreamExt, TryStreamExt},
        Buffer,
    };

    INIT.call_once(env_logger::init);

    let dir = tempfile::tempdir()?;
    let base = base_time();
    write_file(dir.path(), "c1", base + minutes(1), 0, "1\n2\n")?;
    write_file(dir.path(), "c1", base + minutes(61), 0, "3\n4\n")?;

    let consumer = LocalConsumer::open(options(dir.path(), "c1")).await?;
    let records: Vec<_> = consumer.stream().take(4).try_collect().await?;
    let sum: u32 = records
        .iter()
        .map(|r| r.as_str().unwrap().parse::<u32>().unwrap())
        .sum();
    assert_eq!(sum, 10);
    assert_eq!(consumer.metrics().messages_consumed, 4);

    Ok(())
}

#[cfg_attr(feature = "runtime-tokio", tokio::test)]
#[cfg_attr(feature = "runtime-async-std", async_std::test)]
async fn concurrent_partitions() -> anyhow::Result<()> {
    use tributary_local::{CheckpointStore, LocalConsumer};
    use tributary_types::export::futures::try_join;

    INIT.call_once(env_logger::init);

    let dir = tempfile::tempdir()?;
    let root = dir.path().join("stream");
    let cp_dir = dir.path().join("checkpoints");
    let base = base_time();

    let lines: String = (0..20).map(|i| format!("{i}\n")).collect();
    write_file(&root, "c1", base + minutes(1), 0, &lines)?;
    write_file(&root, "c2", base + minutes(1), 0, &lines)?;

    let consumer = |p: &str| {
        let mut options = options(&root, p);
        options.set_checkpoint_dir(&cp_dir);
        LocalConsumer::open(options)
    };
    let c1 = consumer("c1").await?;
    let c2 = consumer("c2").await?;

    // both write into the same checkpoint directory at the same time
    try_join!(read_and_mark(&c1, 7), read_and_mark(&c2, 13))?;

    let cp1 = CheckpointStore::new(&cp_dir, "test", partition("c1"))
        .load()
        .await?
        .unwrap();
    let cp2 = CheckpointStore::new(&cp_dir, "test", partition("c2"))
        .load()
        .await?
        .unwrap();
    assert_eq!(cp1.file, Some(file_name("c1", base + minutes(1), 0)));
    assert_eq!(cp1.record_offset, 7);
    assert_eq!(cp2.file, Some(file_name("c2", base + minutes(1), 0)));
    assert_eq!(cp2.record_offset, 13);

    Ok(())
}

async fn read_and_mark(consumer: &tributary_local::LocalConsumer, n: usize) -> anyhow::Result<()> {
    for _ in 0..n {
        consumer.next().await?;
        consumer.mark().await?;
    }
    Ok(())
}
