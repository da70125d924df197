//! Sample data loaded when the toolbox starts without persisted state.

use time::macros::{date, datetime, time};
use time::{Duration, OffsetDateTime};
use toolbox_core::{
    AgendaDraft, AgendaStatus, EntityId, Meeting, MeetingDraft, MeetingStatus, MemberDraft, MemberRole, MemberStatus,
    Participant, Priority, Task, TaskDraft, TaskStatus, TeamMember,
};

const SEEDED_AT: OffsetDateTime = datetime!(2024-08-01 08:00 UTC);

/// Initial contents of the three collections.
#[derive(Debug, Clone, Default)]
pub struct Seed {
    /// Tasks, ids included.
    pub tasks: Vec<Task>,
    /// Meetings with their agendas and participants.
    pub meetings: Vec<Meeting>,
    /// Directory members.
    pub members: Vec<TeamMember>,
}

impl Seed {
    /// Built-in demo data set.
    #[must_use]
    pub fn sample() -> Self {
        Self {
            tasks: sample_tasks(),
            meetings: sample_meetings(),
            members: sample_members(),
        }
    }
}

fn member(
    id: u64,
    (name, employee_id, email): (&str, &str, &str),
    (department, position, role): (&str, &str, MemberRole),
    join_date: time::Date,
    status: MemberStatus,
) -> TeamMember {
    TeamMember::from_draft(
        EntityId(id),
        MemberDraft {
            name: name.into(),
            employee_id: employee_id.into(),
            email: email.into(),
            phone: format!("0812-0000-{id:04}"),
            department: department.into(),
            position: position.into(),
            role,
            join_date,
            location: "Jakarta".into(),
            status,
        },
    )
}

fn sample_members() -> Vec<TeamMember> {
    vec![
        member(
            1,
            ("Budi Santoso", "EMP-001", "budi@example.invalid"),
            ("Sekretariat", "Ketua Tim", MemberRole::Leader),
            date!(2019 - 03 - 01),
            MemberStatus::Active,
        ),
        member(
            2,
            ("Siti Aminah", "EMP-002", "siti@example.invalid"),
            ("Keuangan", "Bendahara", MemberRole::Coordinator),
            date!(2020 - 07 - 15),
            MemberStatus::Active,
        ),
        member(
            3,
            ("Dewi Lestari", "EMP-003", "dewi@example.invalid"),
            ("Humas", "Staf Publikasi", MemberRole::Member),
            date!(2022 - 01 - 10),
            MemberStatus::Active,
        ),
        member(
            4,
            ("Andi Wijaya", "EMP-004", "andi@example.invalid"),
            ("IT", "Pengembang", MemberRole::Member),
            date!(2021 - 11 - 01),
            MemberStatus::Active,
        ),
        member(
            5,
            ("Rina Kurnia", "EMP-005", "rina@example.invalid"),
            ("Keuangan", "Staf Akuntansi", MemberRole::Member),
            date!(2018 - 05 - 21),
            MemberStatus::Inactive,
        ),
    ]
}

fn task(id: u64, draft: TaskDraft) -> Task {
    let stamp = SEEDED_AT + Duration::minutes(i64::try_from(id).unwrap_or_default());
    Task::from_draft(EntityId(id), draft, stamp)
}

fn sample_tasks() -> Vec<Task> {
    vec![
        task(
            1,
            TaskDraft {
                title: "Audit kas kecil".into(),
                description: Some("Cocokkan bukti pengeluaran Juli".into()),
                priority: Priority::High,
                due_date: Some(date!(2024 - 08 - 20)),
                assignee_id: Some(EntityId(2)),
                assignee: "Siti Aminah".into(),
                category: "Keuangan".into(),
                ..TaskDraft::default()
            },
        ),
        task(
            2,
            TaskDraft {
                title: "Perbarui situs internal".into(),
                status: TaskStatus::InProgress,
                due_date: Some(date!(2024 - 09 - 15)),
                assignee_id: Some(EntityId(4)),
                assignee: "Andi Wijaya".into(),
                category: "IT".into(),
                progress: 40,
                ..TaskDraft::default()
            },
        ),
        task(
            3,
            TaskDraft {
                title: "Siaran pers kegiatan bakti sosial".into(),
                priority: Priority::Low,
                status: TaskStatus::Completed,
                due_date: Some(date!(2024 - 07 - 30)),
                assignee_id: Some(EntityId(3)),
                assignee: "Dewi Lestari".into(),
                category: "Humas".into(),
                progress: 100,
                ..TaskDraft::default()
            },
        ),
        task(
            4,
            TaskDraft {
                title: "Rekap absensi bulanan".into(),
                due_date: Some(date!(2024 - 09 - 05)),
                assignee_id: Some(EntityId(1)),
                assignee: "Budi Santoso".into(),
                ..TaskDraft::default()
            },
        ),
        task(
            5,
            TaskDraft {
                title: "Laporan pertanggungjawaban Q2".into(),
                priority: Priority::Urgent,
                status: TaskStatus::Overdue,
                due_date: Some(date!(2024 - 07 - 31)),
                assignee_id: Some(EntityId(2)),
                assignee: "Siti Aminah".into(),
                category: "Keuangan".into(),
                progress: 70,
                ..TaskDraft::default()
            },
        ),
    ]
}

fn participant(id: u64, name: &str, role: &str) -> Participant {
    Participant {
        member_id: Some(EntityId(id)),
        name: name.into(),
        role: role.into(),
    }
}

fn agenda(title: &str, status: AgendaStatus) -> AgendaDraft {
    AgendaDraft {
        title: title.into(),
        description: None,
        status,
    }
}

fn sample_meetings() -> Vec<Meeting> {
    let mut review = Meeting::from_draft(
        EntityId(1),
        MeetingDraft {
            title: "Rapat Evaluasi Bulanan".into(),
            date: date!(2024 - 07 - 29),
            start_time: time!(09:00),
            duration_minutes: 90,
            location: Some("Ruang Rapat A".into()),
            organizer_id: Some(EntityId(1)),
            organizer: "Budi Santoso".into(),
            agendas: vec![
                agenda("Evaluasi program Juli", AgendaStatus::Completed),
                agenda("Kendala pelaporan keuangan", AgendaStatus::CarryOver),
                agenda("Rencana bakti sosial", AgendaStatus::Discussed),
            ],
            participants: vec![
                participant(1, "Budi Santoso", "Pemimpin Rapat"),
                participant(2, "Siti Aminah", "Notulis"),
                participant(3, "Dewi Lestari", "Peserta"),
            ],
        },
        SEEDED_AT,
    );
    review.record_minutes("Program Juli berjalan sesuai rencana. Pelaporan keuangan dibahas ulang bulan depan.".into());

    let coordination = Meeting::from_draft(
        EntityId(2),
        MeetingDraft {
            title: "Koordinasi Persiapan Audit".into(),
            date: date!(2024 - 09 - 02),
            start_time: time!(13:30),
            duration_minutes: 60,
            location: Some("Daring (Zoom)".into()),
            organizer_id: Some(EntityId(2)),
            organizer: "Siti Aminah".into(),
            agendas: vec![
                agenda("Pembagian tugas tim audit", AgendaStatus::Pending),
                agenda("Jadwal pemeriksaan dokumen", AgendaStatus::Pending),
            ],
            participants: vec![
                participant(2, "Siti Aminah", "Pemimpin Rapat"),
                participant(4, "Andi Wijaya", "Peserta"),
            ],
        },
        SEEDED_AT + Duration::minutes(1),
    );

    let mut outing = Meeting::from_draft(
        EntityId(3),
        MeetingDraft {
            title: "Rapat Panitia Gathering".into(),
            date: date!(2024 - 09 - 20),
            start_time: time!(15:00),
            duration_minutes: 45,
            location: None,
            organizer_id: Some(EntityId(3)),
            organizer: "Dewi Lestari".into(),
            agendas: vec![agenda("Pemilihan lokasi", AgendaStatus::Pending)],
            participants: vec![participant(3, "Dewi Lestari", "Pemimpin Rapat")],
        },
        SEEDED_AT + Duration::minutes(2),
    );
    outing.status = MeetingStatus::Cancelled;

    vec![review, coordination, outing]
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use toolbox_core::member::employee_id_key;

    #[test]
    fn sample_ids_are_unique_per_collection() {
        let seed = Seed::sample();
        let task_ids: HashSet<_> = seed.tasks.iter().map(|task| task.id).collect();
        let meeting_ids: HashSet<_> = seed.meetings.iter().map(|meeting| meeting.id).collect();
        let member_ids: HashSet<_> = seed.members.iter().map(|member| member.id).collect();
        assert_eq!(task_ids.len(), seed.tasks.len());
        assert_eq!(meeting_ids.len(), seed.meetings.len());
        assert_eq!(member_ids.len(), seed.members.len());
    }

    #[test]
    fn sample_employee_ids_are_unique() {
        let seed = Seed::sample();
        let keys: HashSet<_> = seed
            .members
            .iter()
            .map(|member| employee_id_key(&member.employee_id))
            .collect();
        assert_eq!(keys.len(), seed.members.len());
    }

    #[test]
    fn sample_assignees_exist_in_directory() {
        let seed = Seed::sample();
        for task in &seed.tasks {
            let id = task.assignee_id.unwrap_or_else(|| panic!("{} has no assignee id", task.title));
            let member = seed
                .members
                .iter()
                .find(|member| member.id == id)
                .unwrap_or_else(|| panic!("assignee {id} missing"));
            assert_eq!(member.name, task.assignee);
        }
    }

    #[test]
    fn completed_sample_meeting_has_minutes() {
        let seed = Seed::sample();
        let completed: Vec<_> = seed
            .meetings
            .iter()
            .filter(|meeting| meeting.status == MeetingStatus::Completed)
            .collect();
        assert_eq!(completed.len(), 1);
        assert!(completed[0].minutes().is_some());
        assert_eq!(completed[0].carry_over_items().count(), 1);
    }
}
