mod args;
mod client;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use reqwest::Client;

use arkitek_common::{BenchmarkRun, ClusterLink, TestRun};

use crate::args::{Args, BootCommand, Command, LinkCommand, RunCommand};
use crate::client::{api_url, success_body};
use crate::output::{print_benchmark, print_link, print_links, print_test_run};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let client = Client::new();
    let base = args.server_url.as_str();

    match args.command {
        Command::Link { subcommand } => match subcommand {
            LinkCommand::List { json } => {
                let resp = client.get(api_url(base, "/cluster-links")).send().await?;
                let body = success_body(resp, "list cluster links").await?;
                if json {
                    println!("{body}");
                } else {
                    let links: Vec<ClusterLink> = serde_json::from_str(&body)?;
                    print_links(&links);
                }
            }
            LinkCommand::Create {
                name,
                endpoint,
                credentials,
                builder_type,
            } => {
                let mut body = serde_json::json!({
                    "name": name,
                    "endpoint": endpoint,
                });
                if let Some(c) = credentials {
                    body["credentials"] = serde_json::json!(c);
                }
                if let Some(b) = builder_type {
                    body["builderType"] = serde_json::json!(b);
                }
                let resp = client
                    .post(api_url(base, "/cluster-links"))
                    .json(&body)
                    .send()
                    .await?;
                let text = success_body(resp, "create cluster link").await?;
                let link: ClusterLink = serde_json::from_str(&text)?;
                println!("✓ Cluster link '{}' created", link.name);
                print_link(&link);
            }
            LinkCommand::Delete { id } => {
                let resp = client
                    .delete(api_url(base, &format!("/cluster-links/{id}")))
                    .send()
                    .await?;
                success_body(resp, "delete cluster link").await?;
                println!("✓ Cluster link '{id}' deleted");
            }
        },
        Command::Boot { subcommand } => match subcommand {
            BootCommand::Generate {
                cluster,
                servers,
                boot_image,
                kernel_params,
                output,
            } => {
                let body = serde_json::json!({
                    "clusterName": &cluster,
                    "serverCount": servers,
                    "bootImage": boot_image,
                    "kernelParams": kernel_params,
                });
                let resp = client
                    .post(api_url(base, "/ipxe/generate"))
                    .json(&body)
                    .send()
                    .await?;
                let script = success_body(resp, "generate boot script").await?;

                let path = output.unwrap_or_else(|| PathBuf::from(format!("{cluster}-boot.ipxe")));
                if path.as_os_str() == "-" {
                    print!("{script}");
                } else {
                    tokio::fs::write(&path, script).await?;
                    println!(
                        "✓ Boot script for '{}' ({} servers) written to {}",
                        cluster,
                        servers,
                        path.display()
                    );
                }
            }
        },
        Command::Run { subcommand } => match subcommand {
            RunCommand::Benchmark {
                endpoint,
                test_type,
                iterations,
            } => {
                let body = serde_json::json!({
                    "endpoint": endpoint,
                    "testType": test_type,
                    "iterations": iterations,
                });
                let resp = client
                    .post(api_url(base, "/benchmark/run"))
                    .json(&body)
                    .send()
                    .await?;
                let text = success_body(resp, "start benchmark").await?;
                let run: BenchmarkRun = serde_json::from_str(&text)?;
                print_benchmark(&run);
            }
            RunCommand::UntilFail {
                cluster,
                test_type,
                max_iterations,
            } => {
                let body = serde_json::json!({
                    "clusterName": cluster,
                    "testType": test_type,
                    "maxIterations": max_iterations,
                });
                let resp = client
                    .post(api_url(base, "/test/run-until-fail"))
                    .json(&body)
                    .send()
                    .await?;
                let text = success_body(resp, "start test run").await?;
                let run: TestRun = serde_json::from_str(&text)?;
                print_test_run(&run);
            }
        },
    }

    Ok(())
}
