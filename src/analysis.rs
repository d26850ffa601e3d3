export![bright_spot, projector, scanner];
