use xkcd::archive::{Client, errors::Error};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Error> {
    tokio::fs::create_dir_all("demos/comics")
        .await
        .map_err(xkcd::archive::errors::DestinationError::from)?;

    let client = Client::builder().concurrency(8).build()?;

    let report = client.download_all("demos/comics").await?;

    for skipped in report.skipped() {
        println!("skipped #{}: {:?}", skipped.index(), skipped.reason());
    }

    println!("saved {} comics", report.saved().len());

    Ok(())
}
