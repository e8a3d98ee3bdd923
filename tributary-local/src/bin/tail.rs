//! Follow one partition of a stream and print its records, like `tail -f` across file rotations.
//!
//! ```ignore
//! tail --root /data/clicks --topic clicks --partition collector-1 --checkpoint-dir /data/cp --mark-every 100
//! ```
//!
//! With `--json`, every record is printed as
//!
//! ```ignore
//! {"header":{"stream_key":"clicks","partition":"collector-1","file":"collector-1-2024-03-09-07-05-00001.log","offset":0,"timestamp":"2024-03-09T07:05:00.0"},"payload":"..."}
//! ```
use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use std::{path::PathBuf, time::Duration};
use tributary_local::{LocalConsumer, LocalConsumerOptions};
use tributary_types::{Buffer, PartitionKey, RecordHeader, StreamKey, Timestamp};

#[derive(Parser)]
struct Args {
    #[clap(long, help = "Directory of the stream, containing the year directories")]
    root: PathBuf,
    #[clap(long, help = "Name of the stream")]
    topic: StreamKey,
    #[clap(long, help = "Partition (collector) to follow")]
    partition: PartitionKey,
    #[clap(long, help = "Name of this consumer", default_value = "tail")]
    consumer: String,
    #[clap(long, help = "Start from this unix timestamp, if there is no checkpoint")]
    start_time: Option<i64>,
    #[clap(long, help = "Where to keep checkpoints; without it, nothing is checkpointed")]
    checkpoint_dir: Option<PathBuf>,
    #[clap(long, help = "Checkpoint after every N records", default_value = "1")]
    mark_every: u64,
    #[clap(long, help = "Seconds to wait for new files", default_value = "1")]
    wait_secs: u64,
    #[clap(long, help = "Print records as JSON")]
    json: bool,
}

#[derive(Serialize)]
struct RecordJson<'a> {
    header: &'a RecordHeader,
    payload: &'a str,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        root,
        topic,
        partition,
        consumer,
        start_time,
        checkpoint_dir,
        mark_every,
        wait_secs,
        json,
    } = Args::parse();

    let mut options = LocalConsumerOptions::new(topic, consumer, partition, root);
    options.set_wait_time_for_file_create(Duration::from_secs(wait_secs));
    if let Some(secs) = start_time {
        options.set_start_time(Timestamp::from_unix_timestamp(secs)?);
    }
    if let Some(dir) = checkpoint_dir {
        options.set_checkpoint_dir(dir);
    }

    let consumer = LocalConsumer::open(options).await?;
    let mut count: u64 = 0;

    while let Some(record) = consumer.next().await? {
        let payload = record.as_str()?;
        if json {
            println!(
                "{}",
                serde_json::to_string(&RecordJson {
                    header: record.header(),
                    payload,
                })?
            );
        } else {
            println!("{payload}");
        }
        count += 1;
        if mark_every > 0 && count % mark_every == 0 {
            consumer.mark().await?;
        }
    }

    Ok(())
}
