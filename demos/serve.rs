use embed_serve::{assets::SampleFiles, prelude::*};

// GET /sample1.json        -> assets/file/sample1.json
// GET /                    -> listing of assets/file/
// GET /all/file/sample1.txt -> the same bundle, not re-rooted

#[tokio::main]
async fn main() -> Result<(), EmbedError> {
    tracing_subscriber::fmt::init();

    let bundle = Bundle::<SampleFiles>::new();
    let sample: Sample1 = bundle.decode("file/sample1.json")?;
    tracing::info!("embedded record: {sample:?}");

    let router = Router::new()
        .mount("/", FileServer::new(bundle.sub("file")?))
        .mount("/all", FileServer::new(bundle).max_age(3600));

    App::new()
        .router(router)
        .dump_routes(true)
        .listen(DEFAULT_ADDR)
        .await
}
