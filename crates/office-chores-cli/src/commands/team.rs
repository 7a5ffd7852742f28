use clap::Subcommand;
use office_chores_core::ChoreStore;

#[derive(Subcommand)]
pub enum TeamAction {
    /// List team members
    List,
    /// Add a team member
    Add {
        /// Member name
        name: String,
    },
    /// Remove a team member
    Remove {
        /// Member ID
        id: String,
    },
}

pub fn run(action: TeamAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = ChoreStore::open()?;

    match action {
        TeamAction::List => {
            let members = store.team_members()?;
            println!("{}", serde_json::to_string_pretty(&members)?);
        }
        TeamAction::Add { name } => {
            let member = store.add_team_member(&name)?;
            println!("Team member added: {}", member.id);
            println!("{}", serde_json::to_string_pretty(&member)?);
        }
        TeamAction::Remove { id } => {
            if store.remove_team_member(&id)? {
                println!("Team member removed: {id}");
            } else {
                println!("Team member not found: {id}");
            }
        }
    }
    Ok(())
}
