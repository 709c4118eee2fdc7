use xkcd::archive::{Client, errors::Error};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Error> {
    let client = Client::new();

    let latest = client.latest().await?;
    println!("latest: #{} {}", latest.number(), latest.title());

    let comic = client.comic(614).await?;
    println!("title: {}", comic.title());
    println!("image: {}", comic.image_url());
    println!("extension: {:?}", comic.extension());
    println!("published: {:?}", comic.published());
    println!("alt: {}", comic.alt());

    Ok(())
}
