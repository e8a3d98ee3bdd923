mod util;
use util::*;

static INIT: std::sync::Once = std::sync::Once::new();

// cargo test --test cursor -- --nocapture
#[cfg_attr(feature = "runtime-tokio", tokio::test)]
#[cfg_attr(feature = "runtime-async-std", async_std::test)]
async fn cross_files() -> anyhow::Result<()> {
    use tributary_local::{LocalConsumer, LocalStreamSource, MessageConsumer};
    use tributary_types::{Buffer, Pull};

    INIT.call_once(env_logger::init);

    let dir = tempfile::tempdir()?;
    let root = dir.path();
    let base = base_time();

    write_file(root, "c1", base + minutes(1), 0, "a\nb\n")?;
    write_file(root, "c1", base + minutes(1), 1, "c\r\n")?;
    // a gap of more than an hour
    write_file(root, "c1", base + minutes(150), 0, "d\ne\n")?;
    write_file(root, "c2", base + minutes(2), 0, "x\n")?;

    let source = LocalStreamSource::new(options(root, "c1")).await?;
    let reader = source.reader_metrics();
    let consumer: LocalConsumer = MessageConsumer::new(source);

    let mut got = Vec::new();
    for _ in 0..5 {
        let record = consumer.next().await?.unwrap();
        got.push((
            record.as_str()?.to_owned(),
            record.header().file().to_owned(),
            *record.header().offset(),
        ));
    }
    let f1 = file_name("c1", base + minutes(1), 0).to_string();
    let f2 = file_name("c1", base + minutes(1), 1).to_string();
    let f3 = file_name("c1", base + minutes(150), 0).to_string();
    assert_eq!(
        got,
        [
            ("a".to_owned(), f1.clone(), 0),
            ("b".to_owned(), f1, 1),
            ("c".to_owned(), f2, 0),
            ("d".to_owned(), f3.clone(), 0),
            ("e".to_owned(), f3, 1),
        ]
    );

    assert!(matches!(consumer.try_next().await?, Pull::Pending));
    assert_eq!(consumer.metrics().messages_consumed, 5);
    let stats = reader.snapshot();
    assert_eq!(stats.files_opened, 3);
    assert_eq!(stats.relocations, 0);
    assert_eq!(stats.bytes_read, 11);

    Ok(())
}

#[cfg_attr(feature = "runtime-tokio", tokio::test)]
#[cfg_attr(feature = "runtime-async-std", async_std::test)]
async fn live_stream() -> anyhow::Result<()> {
    use tributary_local::LocalConsumer;
    use tributary_types::{Buffer, Pull};

    INIT.call_once(env_logger::init);

    let dir = tempfile::tempdir()?;
    let root = dir.path();
    let base = base_time();

    let f1 = write_file(root, "c1", base + minutes(10), 0, "a\nb")?;
    let consumer = LocalConsumer::open(options(root, "c1")).await?;

    let next = |pull: Pull<tributary_types::Record>| -> Option<String> {
        pull.ready().map(|r| r.as_str().unwrap().to_owned())
    };

    assert_eq!(next(consumer.try_next().await?).as_deref(), Some("a"));
    // the partial line is held back while the file may still grow
    assert_eq!(next(consumer.try_next().await?), None);
    assert_eq!(next(consumer.try_next().await?), None);

    append(&f1, "c\nd\n")?;
    assert_eq!(next(consumer.try_next().await?).as_deref(), Some("bc"));
    assert_eq!(next(consumer.try_next().await?).as_deref(), Some("d"));
    assert_eq!(next(consumer.try_next().await?), None);

    // a new file appears after the end of the stream was reached
    write_file(root, "c1", base + minutes(70), 0, "e\nf")?;
    assert_eq!(next(consumer.try_next().await?).as_deref(), Some("e"));
    assert_eq!(next(consumer.try_next().await?), None);

    // a trailing partial line is delivered once there is a next file
    write_file(root, "c1", base + minutes(71), 0, "g\n")?;
    assert_eq!(next(consumer.try_next().await?).as_deref(), Some("f"));
    assert_eq!(next(consumer.try_next().await?).as_deref(), Some("g"));
    assert_eq!(next(consumer.try_next().await?), None);

    Ok(())
}

#[cfg_attr(feature = "runtime-tokio", tokio::test)]
#[cfg_attr(feature = "runtime-async-std", async_std::test)]
async fn purged_files() -> anyhow::Result<()> {
    use tributary_local::{Checkpoint, CheckpointStore, LocalStreamSource, MessageConsumer};
    use tributary_types::Buffer;

    INIT.call_once(env_logger::init);

    let dir = tempfile::tempdir()?;
    let root = dir.path().join("stream");
    let cp_dir = dir.path().join("checkpoints");
    let base = base_time();

    write_file(&root, "c1", base + minutes(1), 0, "a\n")?;
    write_file(&root, "c1", base + minutes(2), 0, "b\n")?;
    write_file(&root, "c1", base + minutes(4), 0, "d\n")?;

    // the checkpoint points into a file that has since been purged
    let mut options = options(&root, "c1");
    options.set_checkpoint_dir(&cp_dir);
    CheckpointStore::new(&cp_dir, "test", partition("c1"))
        .save(&Checkpoint::new(file_name("c1", base + minutes(3), 0), 5))
        .await?;

    let source = LocalStreamSource::new(options).await?;
    let reader = source.reader_metrics();
    let consumer = MessageConsumer::new(source);

    let record = consumer.next().await?.unwrap();
    assert_eq!(record.as_str()?, "d");
    assert_eq!(*record.header().offset(), 0);
    assert_eq!(
        record.header().file(),
        file_name("c1", base + minutes(4), 0).to_string()
    );
    assert_eq!(reader.snapshot().relocations, 1);

    Ok(())
}

#[cfg_attr(feature = "runtime-tokio", tokio::test)]
#[cfg_attr(feature = "runtime-async-std", async_std::test)]
async fn vanished_file() -> anyhow::Result<()> {
    use tributary_local::{LocalStreamSource, MessageConsumer};
    use tributary_types::Buffer;

    INIT.call_once(env_logger::init);

    let dir = tempfile::tempdir()?;
    let root = dir.path();
    let base = base_time();

    write_file(root, "c1", base + minutes(1), 0, "a\n")?;
    let f2 = write_file(root, "c1", base + minutes(2), 0, "b\n")?;
    write_file(root, "c1", base + minutes(3), 0, "c\n")?;

    let source = LocalStreamSource::new(options(root, "c1")).await?;
    let reader = source.reader_metrics();
    let consumer = MessageConsumer::new(source);

    assert_eq!(consumer.next().await?.unwrap().as_str()?, "a");
    // retention removes the next file while it is still in the index
    std::fs::remove_file(f2)?;
    assert_eq!(consumer.next().await?.unwrap().as_str()?, "c");
    assert_eq!(reader.snapshot().relocations, 1);
    assert_eq!(reader.snapshot().files_opened, 2);

    Ok(())
}

#[cfg_attr(feature = "runtime-tokio", tokio::test)]
#[cfg_attr(feature = "runtime-async-std", async_std::test)]
async fn purged_current_file() -> anyhow::Result<()> {
    use tributary_local::{LocalStreamSource, MessageConsumer};
    use tributary_types::{Buffer, Pull};

    INIT.call_once(env_logger::init);

    let dir = tempfile::tempdir()?;
    let root = dir.path();
    let base = base_time();

    let f1 = write_file(root, "c1", base + minutes(10), 0, "a\n")?;

    let source = LocalStreamSource::new(options(root, "c1")).await?;
    let reader = source.reader_metrics();
    let consumer = MessageConsumer::new(source);

    assert_eq!(consumer.next().await?.unwrap().as_str()?, "a");
    assert!(matches!(consumer.try_next().await?, Pull::Pending));
    assert_eq!(reader.snapshot().relocations, 0);

    // retention removes the file being read, and the collector moves on
    std::fs::remove_file(f1)?;
    write_file(root, "c1", base + minutes(20), 0, "b\n")?;

    let record = consumer.next().await?.unwrap();
    assert_eq!(record.as_str()?, "b");
    assert_eq!(
        record.header().file(),
        file_name("c1", base + minutes(20), 0).to_string()
    );
    assert_eq!(*record.header().offset(), 0);
    assert_eq!(reader.snapshot().relocations, 1);

    Ok(())
}

#[cfg_attr(feature = "runtime-tokio", tokio::test)]
#[cfg_attr(feature = "runtime-async-std", async_std::test)]
async fn start_time() -> anyhow::Result<()> {
    use tributary_local::LocalConsumer;
    use tributary_types::Buffer;

    INIT.call_once(env_logger::init);

    let dir = tempfile::tempdir()?;
    let root = dir.path();
    let base = base_time();

    write_file(root, "c1", base + minutes(10), 0, "a\n")?;
    write_file(root, "c1", base + minutes(15), 3, "b\n")?;
    write_file(root, "c1", base + minutes(20), 0, "c\n")?;

    let mut options = options(root, "c1");
    options.set_start_time(base + minutes(15) + time::Duration::seconds(30));
    let consumer = LocalConsumer::open(options).await?;
    assert_eq!(consumer.next().await?.unwrap().as_str()?, "b");
    assert_eq!(consumer.next().await?.unwrap().as_str()?, "c");

    // long before retention
    let mut options = util::options(root, "c1");
    options.set_start_time(base - time::Duration::days(30));
    let consumer = LocalConsumer::open(options).await?;
    assert_eq!(consumer.next().await?.unwrap().as_str()?, "a");

    Ok(())
}
