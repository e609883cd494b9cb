use volley::error::AppResult;

fn main() -> AppResult<()> {
    volley::target::run()
}
