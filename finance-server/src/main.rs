use finance_common::clock::{Clock, ClockHandle, LocalClock};
use finance_common::db::{self, MemoryStore, PgStore, RecordStoreHandle};

use actix_web::web::Data;
use actix_web::{App, HttpServer};
use flexi_logger::{
    Age, Cleanup, Criterion, Duplicate, FileSpec, LogSpecification, Logger, Naming, WriteMode,
};
use std::net::IpAddr;
use std::sync::Arc;

mod env;
mod handlers;
mod middleware;
mod services;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let mut port = 8001u16;
    let mut bind_addr: IpAddr = [0, 0, 0, 0].into();

    let mut args = std::env::args();

    // Eat the first argument, which is the relative path to the executable
    args.next();

    while let Some(arg) = args.next() {
        match arg.to_lowercase().as_str() {
            "--port" => {
                let port_str = {
                    let next_arg = args.next();

                    match next_arg {
                        Some(s) => s,
                        None => {
                            eprintln!("ERROR: --port option specified but no port was given");
                            std::process::exit(1);
                        }
                    }
                };

                port = {
                    let port_result = port_str.parse::<u16>();

                    match port_result {
                        Ok(p) => p,
                        Err(_) => {
                            eprintln!("ERROR: Incorrect format for port. Integer expected");
                            std::process::exit(1);
                        }
                    }
                };

                continue;
            }
            "--bind" => {
                let addr_str = match args.next() {
                    Some(s) => s,
                    None => {
                        eprintln!("ERROR: --bind option specified but no address was given");
                        std::process::exit(1);
                    }
                };

                bind_addr = match addr_str.parse::<IpAddr>() {
                    Ok(a) => a,
                    Err(_) => {
                        eprintln!("ERROR: Incorrect format for bind address. IP address expected");
                        std::process::exit(1);
                    }
                };

                continue;
            }
            a => {
                eprintln!("ERROR: Invalid argument: {}", &a);
                std::process::exit(1);
            }
        }
    }

    if let Err(e) = env::Config::from_env() {
        eprintln!("ERROR: {e}");
        std::process::exit(1);
    }

    let log_spec = match LogSpecification::parse(&env::CONF.log_level) {
        Ok(s) => s,
        Err(_) => {
            eprintln!("ERROR: Invalid log level '{}'", env::CONF.log_level);
            std::process::exit(1);
        }
    };

    let _logger = Logger::with(log_spec)
        .log_to_file(FileSpec::default().directory(&env::CONF.log_dir))
        .rotate(
            Criterion::Age(Age::Day),
            Naming::Timestamps,
            Cleanup::KeepLogAndCompressedFiles(60, 365),
        )
        .cleanup_in_background_thread(true)
        .duplicate_to_stdout(Duplicate::All)
        .write_mode(WriteMode::Async)
        .format(|writer, now, record| {
            write!(
                writer,
                "{:5} | {} | {}:{} | {}",
                record.level(),
                now.format("%Y-%m-%dT%H:%M:%S%.6fZ"),
                record.module_path().unwrap_or("<unknown>"),
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .use_utc()
        .start()
        .expect("Failed to start logger");

    let actix_workers = env::CONF.actix_worker_count;

    let store: RecordStoreHandle = match env::CONF.store_backend {
        env::StoreBackend::Postgres => {
            log::info!("Connecting to database...");

            // To prevent resource starvation, max connections must be at least as large as the
            // number of actix workers
            let db_max_connections = env::CONF.db_max_connections.max(actix_workers as u32);

            let db_async_pool =
                match db::create_db_async_pool(&env::CONF.database_uri(), db_max_connections)
                    .await
                {
                    Ok(p) => p,
                    Err(e) => {
                        eprintln!("ERROR: Failed to connect to database: {e}");
                        std::process::exit(1);
                    }
                };

            if let Err(e) = db::ensure_schema(&db_async_pool).await {
                log::error!("{e}");
                eprintln!("ERROR: Failed to create database schema: {e}");
                std::process::exit(1);
            }

            log::info!("Successfully connected to database");

            Arc::new(PgStore::new(&db_async_pool))
        }
        env::StoreBackend::Memory => {
            log::warn!("Using in-memory store. Records will be lost when the server stops.");
            Arc::new(MemoryStore::new())
        }
    };

    let clock: ClockHandle = Arc::new(LocalClock::new());

    match db::seed_default_categories(store.as_ref(), clock.now()).await {
        Ok(true) => (),
        Ok(false) => log::info!("Categories already exist. Skipping default categories."),
        Err(e) => {
            log::error!("{e}");
            eprintln!("ERROR: Failed to seed default categories: {e}");
            std::process::exit(1);
        }
    }

    log::info!("Listening on {bind_addr}:{port}");

    HttpServer::new(move || {
        App::new()
            .app_data(Data::new(store.clone()))
            .app_data(Data::new(clock.clone()))
            .configure(services::api::configure)
            .wrap(middleware::CorsMiddleware::default())
            .wrap(actix_web::middleware::Logger::default())
    })
    .workers(actix_workers)
    .bind((bind_addr, port))?
    .run()
    .await?;

    Ok(())
}
