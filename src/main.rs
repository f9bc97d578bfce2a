use accounts::utils::errors::AccountError;

fn main() -> Result<(), AccountError> {
    tokio::runtime::Builder::new_multi_thread()
        // Cap the number of blocking threads - bcrypt hashing runs there and a burst of sign-ups
        // would otherwise spawn a thread per hash.
        .max_blocking_threads(num_cpus::get())
        .enable_all()
        .build()
        .expect("Unable to build the tokio runtime")
        .block_on(async {
            accounts::lib_main().await
        })
}
