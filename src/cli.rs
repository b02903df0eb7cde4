// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{Arg, ArgAction, Command, value_parser};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .help("Print output as pretty JSON")
            .action(ArgAction::SetTrue),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .help("Print output as JSON lines")
            .action(ArgAction::SetTrue),
    )
}

fn date_arg() -> Arg {
    Arg::new("date")
        .long("date")
        .value_name("YYYY-MM-DD")
        .help("Reference date for billing-period resolution (default: today)")
}

fn report_cmd(name: &'static str, about: &'static str) -> Command {
    json_flags(Command::new(name).about(about).arg(date_arg()))
}

pub fn build_cli() -> Command {
    Command::new("cardclip")
        .about("Card spending tracker: billing-period analytics, category rules, recurring bills")
        .version(env!("CARGO_PKG_VERSION"))
        .subcommand_required(false)
        .subcommand(Command::new("init").about("Create the data directory and report its location"))
        .subcommand(
            Command::new("card")
                .about("Manage cards")
                .subcommand(
                    Command::new("add")
                        .about("Add a card")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .required(true)
                                .help("Credit limit in won"),
                        )
                        .arg(
                            Arg::new("due-day")
                                .long("due-day")
                                .required(true)
                                .value_parser(value_parser!(u32))
                                .help("Statement due day of month (1-31)"),
                        )
                        .arg(
                            Arg::new("tier")
                                .long("tier")
                                .action(ArgAction::Append)
                                .value_name("AMOUNT:BENEFIT")
                                .help("Performance tier, repeatable (e.g. 300000:5% cashback)"),
                        ),
                )
                .subcommand(json_flags(Command::new("list").about("List cards")))
                .subcommand(
                    Command::new("rm")
                        .about("Remove a card")
                        .arg(Arg::new("id").long("id").required(true)),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Manage transactions")
                .subcommand(
                    Command::new("add")
                        .about("Record a transaction (negative amount = expense)")
                        .arg(
                            Arg::new("date")
                                .long("date")
                                .required(true)
                                .value_name("YYYY-MM-DD[ HH:MM]"),
                        )
                        .arg(Arg::new("merchant").long("merchant").required(true))
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("card")
                                .long("card")
                                .required(true)
                                .help("Card id"),
                        )
                        .arg(Arg::new("description").long("description")),
                )
                .subcommand(
                    json_flags(
                        Command::new("list")
                            .about("List transactions in the billing period")
                            .arg(date_arg())
                            .arg(
                                Arg::new("all")
                                    .long("all")
                                    .help("Ignore the billing period and list everything")
                                    .action(ArgAction::SetTrue),
                            )
                            .arg(Arg::new("card").long("card").help("Filter by card id"))
                            .arg(
                                Arg::new("merchant")
                                    .long("merchant")
                                    .help("Filter by merchant substring"),
                            ),
                    ),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Remove a transaction")
                        .arg(Arg::new("id").long("id").required(true)),
                ),
        )
        .subcommand(
            Command::new("rules")
                .about("Manage category rules (ordered, first match wins)")
                .subcommand(
                    Command::new("add")
                        .about("Add a rule at the top of the list (highest priority)")
                        .arg(Arg::new("pattern").long("pattern").required(true))
                        .arg(Arg::new("category").long("category").required(true))
                        .arg(Arg::new("sub-category").long("sub-category")),
                )
                .subcommand(json_flags(Command::new("list").about("List rules in priority order")))
                .subcommand(
                    Command::new("rm")
                        .about("Remove a rule")
                        .arg(Arg::new("id").long("id").required(true)),
                )
                .subcommand(
                    Command::new("test")
                        .about("Classify a sample merchant against the stored rules")
                        .arg(Arg::new("merchant").long("merchant").required(true)),
                ),
        )
        .subcommand(
            Command::new("installment")
                .about("Manage installment plans")
                .subcommand(
                    Command::new("add")
                        .about("Add an installment plan")
                        .arg(
                            Arg::new("start-date")
                                .long("start-date")
                                .required(true)
                                .value_name("YYYY-MM-DD"),
                        )
                        .arg(Arg::new("merchant").long("merchant").required(true))
                        .arg(Arg::new("card").long("card").required(true).help("Card id"))
                        .arg(
                            Arg::new("total")
                                .long("total")
                                .required(true)
                                .help("Total principal in won"),
                        )
                        .arg(
                            Arg::new("months")
                                .long("months")
                                .required(true)
                                .value_parser(value_parser!(u32))
                                .help("Number of monthly rounds (>= 2)"),
                        ),
                )
                .subcommand(
                    json_flags(
                        Command::new("list")
                            .about("List installments with amortization status")
                            .arg(date_arg()),
                    ),
                )
                .subcommand(
                    Command::new("rm")
                        .about("Remove an installment plan")
                        .arg(Arg::new("id").long("id").required(true)),
                ),
        )
        .subcommand(
            Command::new("settings")
                .about("View or change settings")
                .subcommand(json_flags(Command::new("show").about("Show current settings")))
                .subcommand(
                    Command::new("set")
                        .about("Update settings")
                        .arg(
                            Arg::new("start-day")
                                .long("start-day")
                                .value_parser(value_parser!(u32))
                                .help("Billing period start day of month (1-28)"),
                        )
                        .arg(Arg::new("goal").long("goal").help("Period spending goal in won"))
                        .arg(Arg::new("income").long("income").help("Monthly income in won")),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Billing-period analytics")
                .subcommand(report_cmd("goal", "Goal progress and month-end projection"))
                .subcommand(report_cmd("categories", "Spend by classified category"))
                .subcommand(
                    report_cmd("merchants", "Top merchants by spend").arg(
                        Arg::new("limit")
                            .long("limit")
                            .value_parser(value_parser!(usize))
                            .default_value("5"),
                    ),
                )
                .subcommand(
                    report_cmd("highvalue", "Largest single expenses in the period").arg(
                        Arg::new("limit")
                            .long("limit")
                            .value_parser(value_parser!(usize))
                            .default_value("5"),
                    ),
                )
                .subcommand(report_cmd("weekday", "Spend by day of week"))
                .subcommand(report_cmd("timeslots", "Spend by time of day"))
                .subcommand(report_cmd("cards", "Card utilization and performance tiers"))
                .subcommand(report_cmd("fixed", "Recurring expenses in the period"))
                .subcommand(report_cmd("upcoming", "Predicted upcoming bills")),
        )
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand(
                    Command::new("transactions")
                        .about("Export all transactions")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv|json"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
}
