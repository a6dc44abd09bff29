use crate::core::{
    colors::format_record,
    command_init::CommandInit,
    error::Result,
    output::print_info,
    status::{classify_with_options, ChangeRecord, StatusOptions},
};

pub struct StatusArgs {
    pub files: Vec<String>,
    pub ignored: bool,
    pub json: bool,
}

pub fn execute_status(args: StatusArgs) -> Result<()> {
    let context = CommandInit::initialize()?;
    let pathspecs = context.resolver.resolve_all(&args.files)?;

    let options = StatusOptions {
        include_ignored: args.ignored,
    };
    let records = classify_with_options(&context.git_repo, &pathspecs, options)?
        .collect::<Result<Vec<ChangeRecord>>>()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        print_info("Working tree clean");
        return Ok(());
    }

    for record in &records {
        println!("{}", format_record(record));
    }

    Ok(())
}
