use std::io::Write;

use anyhow::{Result, bail};
use clap::{Subcommand, ValueEnum};
use time::Date;
use toolbox_app::{CreateMemberInput, FilteredView, MemberFilterBuilder, MemberSort};
use toolbox_core::datefmt::{format_long_date, parse_date};
use toolbox_core::{EntityId, MemberPatch, MemberRole, MemberStatus, TeamMember};

use super::{CommandContext, confirm_and_delete, emit_json, filter_error, not_found, toolbox_error};
use crate::OutputFormat;
use crate::table::render_table;

#[derive(Subcommand, Debug)]
pub enum TeamCommand {
    /// List team members.
    List {
        /// Case-insensitive search over name, staff number, email, department and position.
        #[arg(long)]
        text: Option<String>,
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        role: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long, value_enum, default_value_t = MemberOrder::Name)]
        sort: MemberOrder,
    },

    /// Show one member's profile.
    Show { id: EntityId },

    /// Register a member.
    Add {
        #[arg(long)]
        name: String,
        /// Staff number (NIP); must be unique.
        #[arg(long)]
        employee_id: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        phone: String,
        #[arg(long, default_value = "")]
        department: String,
        #[arg(long, default_value = "")]
        position: String,
        #[arg(long)]
        role: Option<MemberRole>,
        /// Defaults to today.
        #[arg(long, value_parser = parse_date)]
        join_date: Option<Date>,
        #[arg(long, default_value = "")]
        location: String,
        #[arg(long)]
        status: Option<MemberStatus>,
    },

    /// Edit a member. Only the given fields change.
    Update {
        id: EntityId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        employee_id: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        department: Option<String>,
        #[arg(long)]
        position: Option<String>,
        #[arg(long)]
        role: Option<MemberRole>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        status: Option<MemberStatus>,
    },

    /// Remove a member from the directory.
    Delete {
        id: EntityId,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MemberOrder {
    Name,
    Joined,
}

impl From<MemberOrder> for MemberSort {
    fn from(order: MemberOrder) -> Self {
        match order {
            MemberOrder::Name => Self::Name,
            MemberOrder::Joined => Self::JoinDate,
        }
    }
}

#[allow(clippy::too_many_lines)]
pub fn run(command: TeamCommand, ctx: &mut CommandContext, out: &mut dyn Write) -> Result<()> {
    match command {
        TeamCommand::List {
            text,
            department,
            role,
            status,
            sort,
        } => {
            let filter = MemberFilterBuilder::new()
                .with_text(text)
                .with_department(department)
                .with_role(role.as_deref())
                .and_then(|builder| builder.with_status(status.as_deref()))
                .map_err(|err| filter_error(&err))?
                .build();
            let members = ctx.toolbox.members();
            let mut view = FilteredView::new(members, filter, MemberSort::from(sort));
            let visible = view.visible(members);
            if ctx.format == OutputFormat::Json {
                return emit_json(out, &visible);
            }
            if visible.is_empty() {
                writeln!(out, "Tidak ada anggota")?;
                return Ok(());
            }
            let rows: Vec<Vec<String>> = visible
                .iter()
                .map(|member| {
                    vec![
                        member.id.to_string(),
                        member.employee_id.clone(),
                        member.name.clone(),
                        member.department.clone(),
                        member.position.clone(),
                        member.role.label().to_owned(),
                        member.status.to_string(),
                    ]
                })
                .collect();
            render_table(out, &["ID", "NIP", "Nama", "Departemen", "Jabatan", "Peran", "Status"], &rows)?;
            let active = visible.iter().filter(|member| member.is_active()).count();
            writeln!(out)?;
            writeln!(out, "{} anggota, {active} aktif", visible.len())?;
            Ok(())
        }
        TeamCommand::Show { id } => {
            let member = ctx.toolbox.members().get(id).ok_or_else(|| not_found("anggota", id))?;
            if ctx.format == OutputFormat::Json {
                return emit_json(out, member);
            }
            render_member(out, member)
        }
        TeamCommand::Add {
            name,
            employee_id,
            email,
            phone,
            department,
            position,
            role,
            join_date,
            location,
            status,
        } => {
            let member = ctx
                .toolbox
                .create_member(CreateMemberInput {
                    name,
                    employee_id,
                    email,
                    phone,
                    department,
                    position,
                    role: role.unwrap_or_default(),
                    join_date,
                    location,
                    status: status.unwrap_or_default(),
                })
                .map_err(|err| toolbox_error(&err))?;
            if ctx.format == OutputFormat::Json {
                return emit_json(out, &member);
            }
            writeln!(
                out,
                "anggota terdaftar: #{} {} ({})",
                member.id, member.name, member.employee_id
            )?;
            Ok(())
        }
        TeamCommand::Update {
            id,
            name,
            employee_id,
            email,
            phone,
            department,
            position,
            role,
            location,
            status,
        } => {
            let patch = MemberPatch {
                name,
                employee_id,
                email,
                phone,
                department,
                position,
                role,
                location,
                status,
            };
            if patch == MemberPatch::default() {
                bail!("tidak ada perubahan yang diberikan");
            }
            if !ctx.toolbox.update_member(id, patch).map_err(|err| toolbox_error(&err))? {
                return Err(not_found("anggota", id));
            }
            writeln!(out, "anggota #{id} diperbarui")?;
            Ok(())
        }
        TeamCommand::Delete { id, yes } => {
            let pending = ctx.toolbox.request_member_deletion(id);
            confirm_and_delete(ctx, pending, &format!("anggota #{id}"), yes, out)
        }
    }
}

fn render_member(out: &mut dyn Write, member: &TeamMember) -> Result<()> {
    writeln!(out, "#{} {}", member.id, member.name)?;
    let rows = [
        ("NIP", member.employee_id.clone()),
        ("Email", member.email.clone()),
        ("Telepon", member.phone.clone()),
        ("Departemen", member.department.clone()),
        ("Jabatan", member.position.clone()),
        ("Peran", member.role.label().to_owned()),
        ("Bergabung", format_long_date(member.join_date)),
        ("Lokasi", member.location.clone()),
        ("Status", member.status.to_string()),
    ];
    for (label, value) in rows {
        let value = if value.trim().is_empty() { "-".to_owned() } else { value };
        writeln!(out, "{label:<10}: {value}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{context, output};
    use toolbox_core::datefmt::format_date;

    fn run_ok(ctx: &mut CommandContext, command: TeamCommand) -> String {
        let mut buffer = Vec::new();
        run(command, ctx, &mut buffer).unwrap_or_else(|err| panic!("command failed: {err:#}"));
        output(buffer)
    }

    fn add(employee_id: &str) -> TeamCommand {
        TeamCommand::Add {
            name: "Eko Prasetyo".into(),
            employee_id: employee_id.into(),
            email: "eko@example.invalid".into(),
            phone: String::new(),
            department: "IT".into(),
            position: "Analis".into(),
            role: None,
            join_date: None,
            location: String::new(),
            status: None,
        }
    }

    #[test]
    fn add_defaults_join_date_to_today() {
        let mut ctx = context();
        let text = run_ok(&mut ctx, add("EMP-006"));
        assert_eq!(text, "anggota terdaftar: #6 Eko Prasetyo (EMP-006)\n");
        let joined = ctx.toolbox.members().get(EntityId(6)).map(|member| format_date(member.join_date));
        assert_eq!(joined.as_deref(), Some("2024-09-01"));
    }

    #[test]
    fn duplicate_staff_number_is_rejected() {
        let mut ctx = context();
        let mut buffer = Vec::new();
        let err = run(add(" emp-002 "), &mut ctx, &mut buffer)
            .err()
            .unwrap_or_else(|| panic!("duplicate staff number must fail"));
        assert_eq!(err.to_string(), "NIP emp-002 sudah terdaftar");
        assert_eq!(ctx.toolbox.members().len(), 5);
    }

    #[test]
    fn list_filters_by_department_and_counts_active() {
        let mut ctx = context();
        let text = run_ok(
            &mut ctx,
            TeamCommand::List {
                text: None,
                department: Some("keuangan".into()),
                role: None,
                status: None,
                sort: MemberOrder::Joined,
            },
        );
        let rows: Vec<&str> = text.lines().skip(2).take(2).collect();
        assert!(rows[0].starts_with("5   EMP-005"));
        assert!(rows[1].starts_with("2   EMP-002"));
        assert!(text.ends_with("2 anggota, 1 aktif\n"));
    }

    #[test]
    fn list_rejects_unknown_role() {
        let mut ctx = context();
        let mut buffer = Vec::new();
        let err = run(
            TeamCommand::List {
                text: None,
                department: None,
                role: Some("direktur".into()),
                status: None,
                sort: MemberOrder::Name,
            },
            &mut ctx,
            &mut buffer,
        )
        .err()
        .unwrap_or_else(|| panic!("unknown role must fail"));
        assert!(err.to_string().contains("direktur"));
    }

    #[test]
    fn show_prints_profile() {
        let mut ctx = context();
        let text = run_ok(&mut ctx, TeamCommand::Show { id: EntityId(2) });
        assert!(text.starts_with("#2 Siti Aminah\n"));
        assert!(text.contains("NIP       : EMP-002\n"));
        assert!(text.contains("Peran     : Koordinator\n"));
    }

    #[test]
    fn update_without_fields_is_rejected() {
        let mut ctx = context();
        let mut buffer = Vec::new();
        let result = run(
            TeamCommand::Update {
                id: EntityId(1),
                name: None,
                employee_id: None,
                email: None,
                phone: None,
                department: None,
                position: None,
                role: None,
                location: None,
                status: None,
            },
            &mut ctx,
            &mut buffer,
        );
        assert!(result.is_err());
    }
}
